//! Chart builder: turns filtered views into declarative, serializable chart
//! descriptions.

mod bar;
mod choropleth;
pub mod description;
pub mod json_contract;
pub mod options;
mod spiral;
mod time_series;

use tracing::debug;

use crate::core::ChartKind;
use crate::error::DashResult;
use crate::query::FilteredView;

pub use description::{
    Axis, BarMode, BarTrace, ChartDescription, ChoroplethTrace, ColorAxis, Frame, Layout,
    LineTrace, LocationMode, Orientation, Scatter3dTrace, Trace, TraceMode,
};
pub use json_contract::{CHART_DESCRIPTION_JSON_SCHEMA_V1, ChartDescriptionJsonContractV1};
pub use options::{ChartOptions, SeriesLayout, SpiralOptions, XField};

/// Builds the description of `view` as a chart of `kind`.
///
/// The result depends only on its inputs. An empty view yields a valid
/// description with no data traces and the configured layout.
pub fn build(
    view: &FilteredView,
    kind: ChartKind,
    options: &ChartOptions,
) -> DashResult<ChartDescription> {
    let chart = match kind {
        ChartKind::TimeSeries | ChartKind::Scatter => {
            time_series::build_series(view, kind, options)
        }
        ChartKind::Choropleth => choropleth::build_choropleth(view, options),
        ChartKind::Bar => bar::build_bar(view, options),
        ChartKind::StackedBar => bar::build_stacked_bar(view, options)?,
        ChartKind::Spiral3d => spiral::build_spiral(view, options)?,
    };

    debug!(
        dataset = %view.dataset,
        kind = %kind,
        traces = chart.traces.len(),
        frames = chart.frames.len(),
        "chart built"
    );
    Ok(chart)
}
