//! Query/filter engine: parameter sets applied to datasets through column
//! mappings, producing transient filtered views.

pub mod aggregate;
pub mod engine;
pub mod mapping;
pub mod params;
pub mod percentile;
pub mod summary;
pub mod view;

pub use aggregate::{aggregate, top_entities};
pub use engine::query;
pub use mapping::{ColumnMapping, ComponentColumns};
pub use params::{AggregateOp, Aggregation, GroupBy, ParameterSet};
pub use percentile::percentile;
pub use summary::{Extremum, SummaryOptions, Tile, ViewSummary, summarize, summary_tiles};
pub use view::{FilteredView, ViewRow};
