pub mod column;
pub mod dataset;
pub mod loader;
pub mod primitives;
pub mod registry;
pub mod scale;
pub mod types;

pub use column::{Column, ColumnData, ColumnKind, TemporalColumn};
pub use dataset::{ColumnSchema, Dataset};
pub use loader::{DatasetSource, DatasetSpec, DerivedColumn, LoaderOptions, load, load_spec};
pub use registry::DatasetRegistry;
pub use scale::LinearScale;
pub use types::{ChartKind, DataPoint, DatasetId, Point3, ValueRange, YearRange};
