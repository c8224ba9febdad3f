use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::DatasetId;

/// One row of a filtered or aggregated view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewRow {
    pub entity: String,
    pub code: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub measure: Option<f64>,
    pub components: SmallVec<[Option<f64>; 6]>,
    pub total: Option<f64>,
    /// Second measure plotted on the x axis of measure-vs-measure scatters.
    #[serde(default)]
    pub x_value: Option<f64>,
    #[serde(default)]
    pub marker_size: Option<f64>,
    #[serde(default)]
    pub marker_color: Option<f64>,
}

impl ViewRow {
    #[must_use]
    pub fn new(entity: impl Into<String>, year: Option<i32>, measure: Option<f64>) -> Self {
        Self {
            entity: entity.into(),
            code: None,
            year,
            month: None,
            measure,
            components: SmallVec::new(),
            total: None,
            x_value: None,
            marker_size: None,
            marker_color: None,
        }
    }

    /// Measure value when present and finite.
    #[must_use]
    pub fn finite_measure(&self) -> Option<f64> {
        self.measure.filter(|v| v.is_finite())
    }
}

/// Transient result of applying a parameter set to a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilteredView {
    pub dataset: DatasetId,
    pub measure_label: String,
    pub component_labels: Vec<String>,
    pub rows: Vec<ViewRow>,
    /// Series order: the requested entity order when a selection was given,
    /// otherwise first-seen order in `rows`.
    pub entity_order: Vec<String>,
    /// `(min, percentile)` of the measure when a percentile was requested.
    pub color_range: Option<(f64, f64)>,
}

impl FilteredView {
    #[must_use]
    pub fn empty(dataset: DatasetId, measure_label: impl Into<String>) -> Self {
        Self {
            dataset,
            measure_label: measure_label.into(),
            component_labels: Vec::new(),
            rows: Vec::new(),
            entity_order: Vec::new(),
            color_range: None,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Distinct years present, ascending.
    #[must_use]
    pub fn years(&self) -> Vec<i32> {
        let mut years: Vec<i32> = self.rows.iter().filter_map(|row| row.year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    pub fn rows_for<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a ViewRow> + 'a {
        self.rows.iter().filter(move |row| row.entity == entity)
    }

    pub fn finite_measures(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(ViewRow::finite_measure)
    }
}
