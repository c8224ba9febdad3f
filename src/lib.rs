//! climate-dash: data-driven climate and emissions dashboards.
//!
//! Datasets are loaded once into a shared registry; page configurations bind
//! query parameters to chart and summary outputs that are recomputed when a
//! viewer changes a control.

pub mod binding;
pub mod chart;
pub mod core;
pub mod dashboard;
pub mod error;
pub mod pages;
pub mod query;
pub mod telemetry;

pub use binding::{OutputObserver, OutputUpdate, PageSession, ParameterKey, ParameterValue};
pub use chart::{ChartDescription, ChartOptions, build};
pub use dashboard::{Dashboard, UnavailablePage};
pub use error::{DashError, DashResult};
pub use pages::{DashboardConfig, PageConfig};
pub use query::{ColumnMapping, FilteredView, ParameterSet, query};
