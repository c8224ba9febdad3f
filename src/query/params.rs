use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, ValueRange, YearRange};
use crate::error::{DashError, DashResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    /// One group per entity across all selected years.
    Entity,
    /// One group per (entity, year) pair.
    EntityYear,
    /// One group per year across all entities, labelled with the mapping's
    /// `category_all` value.
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregateOp {
    Sum,
    Mean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregation {
    pub group_by: GroupBy,
    pub op: AggregateOp,
    #[serde(default)]
    pub top_n: Option<usize>,
}

impl Aggregation {
    #[must_use]
    pub fn sum_by(group_by: GroupBy) -> Self {
        Self {
            group_by,
            op: AggregateOp::Sum,
            top_n: None,
        }
    }

    #[must_use]
    pub fn mean_by(group_by: GroupBy) -> Self {
        Self {
            group_by,
            op: AggregateOp::Mean,
            top_n: None,
        }
    }

    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }
}

/// User-selected values driving one query.
///
/// `entities` keeps selection order: series built from the resulting view
/// follow it. An empty selection means every entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSet {
    #[serde(default)]
    pub entities: IndexSet<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub year_range: Option<YearRange>,
    #[serde(default)]
    pub value_range: Option<ValueRange>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub chart_kind: ChartKind,
    #[serde(default)]
    pub aggregation: Option<Aggregation>,
    #[serde(default)]
    pub color_percentile: Option<f64>,
    /// Keeps the rows of the N entities with the largest summed measure.
    #[serde(default)]
    pub top_entities: Option<usize>,
    /// Expresses each measure as a percentage of its year's total over all
    /// matched rows.
    #[serde(default)]
    pub share_of_year_total: bool,
}

impl ParameterSet {
    #[must_use]
    pub fn new(chart_kind: ChartKind) -> Self {
        Self {
            chart_kind,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_entities<I, S>(mut self, entities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entities = entities.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_year_range(mut self, range: YearRange) -> Self {
        self.year_range = Some(range);
        self
    }

    #[must_use]
    pub fn with_value_range(mut self, range: ValueRange) -> Self {
        self.value_range = Some(range);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn with_chart_kind(mut self, chart_kind: ChartKind) -> Self {
        self.chart_kind = chart_kind;
        self
    }

    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    #[must_use]
    pub fn with_color_percentile(mut self, percentile: f64) -> Self {
        self.color_percentile = Some(percentile);
        self
    }

    #[must_use]
    pub fn with_top_entities(mut self, count: usize) -> Self {
        self.top_entities = Some(count);
        self
    }

    #[must_use]
    pub fn with_share_of_year_total(mut self) -> Self {
        self.share_of_year_total = true;
        self
    }

    pub fn validate(&self) -> DashResult<()> {
        if let Some(percentile) = self.color_percentile {
            if !percentile.is_finite() || !(0.0..=100.0).contains(&percentile) {
                return Err(DashError::InvalidParameter {
                    key: "color_percentile".to_owned(),
                    reason: format!("percentile must be within 0..=100 (got {percentile})"),
                });
            }
        }
        if let Some(range) = self.year_range {
            YearRange::new(range.min, range.max).map_err(|e| DashError::InvalidParameter {
                key: "year_range".to_owned(),
                reason: e.to_string(),
            })?;
        }
        if let Some(range) = self.value_range {
            ValueRange::new(range.min, range.max).map_err(|e| DashError::InvalidParameter {
                key: "value_range".to_owned(),
                reason: e.to_string(),
            })?;
        }
        if self.aggregation.is_some_and(|agg| agg.top_n == Some(0)) {
            return Err(DashError::InvalidParameter {
                key: "aggregation".to_owned(),
                reason: "top_n must be > 0".to_owned(),
            });
        }
        if self.top_entities == Some(0) {
            return Err(DashError::InvalidParameter {
                key: "top_entities".to_owned(),
                reason: "top_entities must be > 0".to_owned(),
            });
        }
        Ok(())
    }
}
