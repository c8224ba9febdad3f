use crate::core::{ChartKind, DataPoint};
use crate::query::{FilteredView, ViewRow};

use super::description::{
    Axis, ChartDescription, ColorAxis, Layout, LineTrace, Trace, TraceMode,
};
use super::options::{ChartOptions, SeriesLayout, XField};

pub(crate) const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const DEFAULT_COLOR_SCALE: &str = "Viridis";

/// Line (time series) or marker (scatter) chart.
pub(crate) fn build_series(
    view: &FilteredView,
    kind: ChartKind,
    options: &ChartOptions,
) -> ChartDescription {
    let default_mode = match kind {
        ChartKind::Scatter => TraceMode::Markers,
        _ => TraceMode::Lines,
    };
    let mode = options.line_mode.unwrap_or(default_mode);

    let traces = match options.series_layout {
        SeriesLayout::PerEntity => per_entity(view, options.x_field, mode),
        SeriesLayout::PerComponent => per_component(view, options.x_field, mode),
        SeriesLayout::Combined => combined(view, options.x_field, mode),
    };
    let color_axis = match options.series_layout {
        SeriesLayout::Combined => marker_color_axis(&traces, options),
        _ => None,
    };

    ChartDescription {
        kind,
        traces,
        frames: Vec::new(),
        layout: Layout {
            title: options.resolved_title(view),
            x_axis: x_axis(options),
            y_axis: Axis::titled(options.y_title.clone()).with_log_scale(options.log_y),
            z_axis: None,
            bar_mode: None,
            color_axis,
            show_legend: options.series_layout != SeriesLayout::Combined,
        },
    }
}

fn x_axis(options: &ChartOptions) -> Axis {
    let mut axis = Axis::titled(options.x_title.clone()).with_log_scale(options.log_x);
    if options.x_field == XField::Month {
        axis.tick_values = (1..=12).map(f64::from).collect();
        axis.tick_labels = MONTH_LABELS.iter().map(|m| (*m).to_owned()).collect();
    }
    axis
}

fn x_of(row: &ViewRow, field: XField) -> Option<f64> {
    match field {
        XField::Year => row.year.map(f64::from),
        XField::Month => row.month.map(f64::from),
        XField::Measure => row.x_value.filter(|v| v.is_finite()),
    }
}

fn sorted(mut points: Vec<DataPoint>) -> Vec<DataPoint> {
    // Stable: rows sharing an x keep view order.
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    points
}

fn per_entity(view: &FilteredView, field: XField, mode: TraceMode) -> Vec<Trace> {
    view.entity_order
        .iter()
        .filter_map(|entity| {
            let points: Vec<DataPoint> = view
                .rows_for(entity)
                .filter_map(|row| {
                    Some(DataPoint::new(x_of(row, field)?, row.finite_measure()?))
                })
                .collect();
            (!points.is_empty())
                .then(|| Trace::Line(LineTrace::new(entity.clone(), mode, sorted(points))))
        })
        .collect()
}

fn per_component(view: &FilteredView, field: XField, mode: TraceMode) -> Vec<Trace> {
    let single = view.entity_order.len() <= 1;
    let mut traces = Vec::new();
    for entity in &view.entity_order {
        for (index, label) in view.component_labels.iter().enumerate() {
            let points: Vec<DataPoint> = view
                .rows_for(entity)
                .filter_map(|row| {
                    let y = row
                        .components
                        .get(index)
                        .copied()
                        .flatten()
                        .filter(|v| v.is_finite())?;
                    Some(DataPoint::new(x_of(row, field)?, y))
                })
                .collect();
            if points.is_empty() {
                continue;
            }
            let name = if single {
                label.clone()
            } else {
                format!("{entity}: {label}")
            };
            traces.push(Trace::Line(LineTrace::new(name, mode, sorted(points))));
        }
    }
    traces
}

/// Every plottable row in one trace, ordered by x.
///
/// Size and color channels are emitted only when every kept row carries a
/// finite value for them, so they stay aligned with `points`.
fn combined(view: &FilteredView, field: XField, mode: TraceMode) -> Vec<Trace> {
    let mut rows: Vec<(f64, f64, &ViewRow)> = view
        .rows
        .iter()
        .filter_map(|row| Some((x_of(row, field)?, row.finite_measure()?, row)))
        .collect();
    if rows.is_empty() {
        return Vec::new();
    }
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let channel = |pick: fn(&ViewRow) -> Option<f64>| -> Vec<f64> {
        rows.iter()
            .map(|(_, _, row)| pick(row).filter(|v| v.is_finite()))
            .collect::<Option<Vec<f64>>>()
            .unwrap_or_default()
    };

    let mut trace = LineTrace::new(
        view.measure_label.clone(),
        mode,
        rows.iter().map(|(x, y, _)| DataPoint::new(*x, *y)).collect(),
    );
    trace.text = rows.iter().map(|(_, _, row)| row.entity.clone()).collect();
    trace.marker_sizes = channel(|row| row.marker_size);
    trace.marker_colors = channel(|row| row.marker_color);
    vec![Trace::Line(trace)]
}

fn marker_color_axis(traces: &[Trace], options: &ChartOptions) -> Option<ColorAxis> {
    let colors = traces
        .iter()
        .filter_map(Trace::as_line)
        .flat_map(|trace| trace.marker_colors.iter().copied());
    let (min, max) = options.color_range.or_else(|| {
        colors.fold(None, |extent: Option<(f64, f64)>, value| {
            Some(extent.map_or((value, value), |(lo, hi)| (lo.min(value), hi.max(value))))
        })
    })?;
    Some(ColorAxis {
        scale: options.color_scale_or(DEFAULT_COLOR_SCALE),
        min,
        max,
    })
}
