//! Reactive binding layer: outputs declare the parameters they depend on and
//! are recomputed when a parameter event changes one of them.

pub mod keys;
pub mod observer;
pub mod output;
pub mod session;
pub mod value;

pub use keys::{ParameterKey, ParameterKeys};
pub use observer::OutputObserver;
pub use output::{OutputBinding, OutputContent, OutputKind, OutputState, OutputUpdate};
pub use session::{OutputSlot, PageSession};
pub use value::ParameterValue;
