use std::f64::consts::TAU;

use crate::core::{ChartKind, LinearScale, Point3};
use crate::error::DashResult;
use crate::query::FilteredView;

use super::description::{Axis, ChartDescription, Layout, Scatter3dTrace, Trace, TraceMode};
use super::options::{ChartOptions, SpiralOptions};
use super::time_series::MONTH_LABELS;

const RING_SEGMENTS: usize = 72;
const REFERENCE_COLOR: &str = "#808080";

fn month_angle(month: u32) -> f64 {
    f64::from(month.saturating_sub(1)) * TAU / 12.0
}

fn polar(radius: f64, angle: f64, z: f64) -> Point3 {
    Point3::new(radius * angle.cos(), radius * angle.sin(), z)
}

/// Monthly anomalies wound around the z (time) axis.
///
/// Rows without a month, a year or a finite measure are skipped; anomalies
/// outside the configured bounds are clamped onto the edge rings.
pub(crate) fn build_spiral(
    view: &FilteredView,
    options: &ChartOptions,
) -> DashResult<ChartDescription> {
    let SpiralOptions {
        min_anomaly,
        max_anomaly,
        radius_scale,
        label_radius,
        reference_levels,
    } = &options.spiral;
    let scale = LinearScale::new(*min_anomaly, *max_anomaly, *radius_scale)?;

    let mut samples: Vec<(f64, f64, u32)> = view
        .rows
        .iter()
        .filter_map(|row| {
            let year = row.year?;
            let month = row.month?;
            let value = row.finite_measure()?;
            let z = f64::from(year) + f64::from(month.saturating_sub(1)) / 12.0;
            Some((z, value, month))
        })
        .collect();
    samples.sort_by(|a, b| a.0.total_cmp(&b.0));

    let layout = Layout {
        title: options.resolved_title(view),
        x_axis: Axis::hidden(),
        y_axis: Axis::hidden(),
        z_axis: Some(Axis::titled(options.x_title.clone())),
        bar_mode: None,
        color_axis: None,
        show_legend: false,
    };

    let Some(top) = samples.last().map(|sample| sample.0) else {
        return Ok(ChartDescription {
            kind: ChartKind::Spiral3d,
            traces: Vec::new(),
            frames: Vec::new(),
            layout,
        });
    };

    let mut traces = vec![Trace::Scatter3d(Scatter3dTrace {
        name: view.measure_label.clone(),
        mode: TraceMode::Lines,
        points: samples
            .iter()
            .map(|&(z, value, month)| polar(scale.map(value), month_angle(month), z))
            .collect(),
        text: Vec::new(),
        color: None,
        show_legend: false,
    })];

    for &level in reference_levels {
        if level < *min_anomaly || level > *max_anomaly {
            continue;
        }
        traces.push(ring(format!("{level}°C"), scale.map(level), top));
    }
    traces.push(ring("Months".to_owned(), *label_radius, top));
    traces.push(Trace::Scatter3d(Scatter3dTrace {
        name: "Month labels".to_owned(),
        mode: TraceMode::Text,
        points: (1..=12)
            .map(|month| polar(label_radius * 1.1, month_angle(month), top))
            .collect(),
        text: MONTH_LABELS.iter().map(|m| (*m).to_owned()).collect(),
        color: None,
        show_legend: false,
    }));

    Ok(ChartDescription {
        kind: ChartKind::Spiral3d,
        traces,
        frames: Vec::new(),
        layout,
    })
}

fn ring(name: String, radius: f64, z: f64) -> Trace {
    Trace::Scatter3d(Scatter3dTrace {
        name,
        mode: TraceMode::Lines,
        points: (0..=RING_SEGMENTS)
            .map(|step| polar(radius, step as f64 * TAU / RING_SEGMENTS as f64, z))
            .collect(),
        text: Vec::new(),
        color: Some(REFERENCE_COLOR.to_owned()),
        show_legend: false,
    })
}
