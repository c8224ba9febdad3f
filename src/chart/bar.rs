use indexmap::IndexMap;

use crate::core::ChartKind;
use crate::error::{DashError, DashResult};
use crate::query::{FilteredView, ViewRow};

use super::description::{Axis, BarMode, BarTrace, ChartDescription, Layout, Trace};
use super::options::ChartOptions;

/// Category label of each row: the entity, followed by the year when the
/// entity occurs on several rows.
fn category_labels(view: &FilteredView) -> impl Fn(&ViewRow) -> String + '_ {
    let mut occurrences: IndexMap<&str, usize> = IndexMap::new();
    for row in &view.rows {
        *occurrences.entry(row.entity.as_str()).or_default() += 1;
    }
    move |row| match row.year {
        Some(year) if occurrences.get(row.entity.as_str()).copied().unwrap_or(0) > 1 => {
            format!("{} ({year})", row.entity)
        }
        _ => row.entity.clone(),
    }
}

/// One bar per view row, in view order.
pub(crate) fn build_bar(view: &FilteredView, options: &ChartOptions) -> ChartDescription {
    let label = category_labels(view);
    let mut categories = Vec::new();
    let mut values = Vec::new();
    for row in &view.rows {
        if let Some(value) = row.finite_measure() {
            categories.push(label(row));
            values.push(value);
        }
    }

    let traces = if categories.is_empty() {
        Vec::new()
    } else {
        vec![Trace::Bar(BarTrace {
            name: view.measure_label.clone(),
            orientation: options.orientation,
            categories,
            values,
            color: options.component_colors.first().cloned(),
        })]
    };

    ChartDescription {
        kind: ChartKind::Bar,
        traces,
        frames: Vec::new(),
        layout: bar_layout(view, options, None),
    }
}

/// One trace per component column, in mapping order.
///
/// Missing component cells contribute 0 so every trace stays aligned with
/// the shared category list.
pub(crate) fn build_stacked_bar(
    view: &FilteredView,
    options: &ChartOptions,
) -> DashResult<ChartDescription> {
    if view.component_labels.is_empty() {
        return Err(DashError::InvalidConfig(format!(
            "stacked bar of `{}` needs at least one component column",
            view.dataset
        )));
    }

    let categories: Vec<String> = view.rows.iter().map(category_labels(view)).collect();
    let traces = if categories.is_empty() {
        Vec::new()
    } else {
        view.component_labels
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let values = view
                    .rows
                    .iter()
                    .map(|row| {
                        row.components
                            .get(index)
                            .copied()
                            .flatten()
                            .filter(|v| v.is_finite())
                            .unwrap_or(0.0)
                    })
                    .collect();
                Trace::Bar(BarTrace {
                    name: label.clone(),
                    orientation: options.orientation,
                    categories: categories.clone(),
                    values,
                    color: options.component_colors.get(index).cloned(),
                })
            })
            .collect()
    };

    Ok(ChartDescription {
        kind: ChartKind::StackedBar,
        traces,
        frames: Vec::new(),
        layout: bar_layout(view, options, Some(options.bar_mode)),
    })
}

fn bar_layout(view: &FilteredView, options: &ChartOptions, bar_mode: Option<BarMode>) -> Layout {
    Layout {
        title: options.resolved_title(view),
        x_axis: Axis::titled(options.x_title.clone()),
        y_axis: Axis::titled(options.y_title.clone()),
        z_axis: None,
        bar_mode,
        color_axis: None,
        show_legend: bar_mode.is_some(),
    }
}
