use tracing::trace;

use crate::core::ChartKind;
use crate::core::primitives::is_iso3_code;
use crate::query::{FilteredView, ViewRow};

use super::description::{
    Axis, ChartDescription, ChoroplethTrace, ColorAxis, Frame, Layout, LocationMode, Trace,
};
use super::options::ChartOptions;

const DEFAULT_COLOR_SCALE: &str = "Viridis";

/// Map chart; one animation frame per year when the view spans several.
pub(crate) fn build_choropleth(view: &FilteredView, options: &ChartOptions) -> ChartDescription {
    let name = view.measure_label.clone();
    let years = view.years();

    let (traces, frames) = if years.len() > 1 {
        let frames: Vec<Frame> = years
            .iter()
            .map(|year| Frame {
                name: year.to_string(),
                traces: vec![map_trace(
                    &name,
                    options.location_mode,
                    view.rows.iter().filter(|row| row.year == Some(*year)),
                )],
            })
            .collect();
        let first = frames
            .first()
            .map(|frame| frame.traces.clone())
            .unwrap_or_default();
        (first, frames)
    } else {
        let trace = map_trace(&name, options.location_mode, view.rows.iter());
        let traces = if view.is_empty() { Vec::new() } else { vec![trace] };
        (traces, Vec::new())
    };

    let color_axis = color_domain(view, options).map(|(min, max)| ColorAxis {
        scale: options.color_scale_or(DEFAULT_COLOR_SCALE),
        min,
        max,
    });

    ChartDescription {
        kind: ChartKind::Choropleth,
        traces,
        frames,
        layout: Layout {
            title: options.resolved_title(view),
            x_axis: Axis::hidden(),
            y_axis: Axis::hidden(),
            z_axis: None,
            bar_mode: None,
            color_axis,
            show_legend: false,
        },
    }
}

fn map_trace<'a>(
    name: &str,
    mode: LocationMode,
    rows: impl Iterator<Item = &'a ViewRow>,
) -> Trace {
    let mut trace = ChoroplethTrace {
        name: name.to_owned(),
        location_mode: mode,
        locations: Vec::new(),
        hover_names: Vec::new(),
        values: Vec::new(),
    };
    for row in rows {
        let Some(value) = row.finite_measure() else {
            continue;
        };
        let Some(location) = location(row, mode) else {
            trace!(entity = %row.entity, "row has no mappable location");
            continue;
        };
        trace.locations.push(location);
        trace.hover_names.push(row.entity.clone());
        trace.values.push(value);
    }
    Trace::Choropleth(trace)
}

fn location(row: &ViewRow, mode: LocationMode) -> Option<String> {
    match mode {
        LocationMode::Iso3 => row.code.clone().filter(|code| is_iso3_code(code)),
        LocationMode::CountryNames => Some(row.entity.clone()),
    }
}

/// Explicit range, else the view's percentile range, else the finite extent.
fn color_domain(view: &FilteredView, options: &ChartOptions) -> Option<(f64, f64)> {
    if let Some(range) = options.color_range.or(view.color_range) {
        return Some(range);
    }
    let mut values = view.finite_measures();
    let first = values.next()?;
    Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
}
