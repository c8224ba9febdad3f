//! Page configurations. Every dashboard page is data, not code.

pub mod catalog;
pub mod config;

pub use catalog::builtin_config;
pub use config::{DashboardConfig, PageConfig};
