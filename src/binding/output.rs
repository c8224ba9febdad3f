use serde::{Deserialize, Serialize};

use crate::chart::{self, ChartDescription, ChartOptions};
use crate::core::{DatasetId, DatasetRegistry};
use crate::error::{DashError, DashResult};
use crate::query::{self, ColumnMapping, ParameterSet, SummaryOptions, Tile};

use super::keys::{ParameterKey, ParameterKeys};
use super::value::ParameterValue;

/// What an output renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutputKind {
    /// Chart of the effective `chart_kind`.
    Chart {
        #[serde(default)]
        options: ChartOptions,
    },
    /// Row of statistic tiles over the view's measure.
    Summary {
        #[serde(default)]
        options: SummaryOptions,
    },
}

/// Declares one page output and the parameters it reacts to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputBinding {
    pub id: String,
    pub dataset: DatasetId,
    pub mapping: ColumnMapping,
    #[serde(default)]
    pub depends_on: ParameterKeys,
    /// Parameters the output starts from; the page defaults when absent.
    #[serde(default)]
    pub params: Option<ParameterSet>,
    pub kind: OutputKind,
}

impl OutputBinding {
    #[must_use]
    pub fn chart(
        id: impl Into<String>,
        dataset: impl Into<DatasetId>,
        mapping: ColumnMapping,
        options: ChartOptions,
    ) -> Self {
        Self {
            id: id.into(),
            dataset: dataset.into(),
            mapping,
            depends_on: ParameterKeys::none(),
            params: None,
            kind: OutputKind::Chart { options },
        }
    }

    #[must_use]
    pub fn summary(
        id: impl Into<String>,
        dataset: impl Into<DatasetId>,
        mapping: ColumnMapping,
        options: SummaryOptions,
    ) -> Self {
        Self {
            id: id.into(),
            dataset: dataset.into(),
            mapping,
            depends_on: ParameterKeys::none(),
            params: None,
            kind: OutputKind::Summary { options },
        }
    }

    #[must_use]
    pub fn depending_on<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = ParameterKey>,
    {
        self.depends_on = self.depends_on.union(keys.into_iter().collect());
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: ParameterSet) -> Self {
        self.params = Some(params);
        self
    }

    /// Base parameters overlaid with the session's values for every
    /// dependency key.
    #[must_use]
    pub fn effective_params(
        &self,
        page_defaults: &ParameterSet,
        session: &ParameterSet,
    ) -> ParameterSet {
        let mut params = self
            .params
            .clone()
            .unwrap_or_else(|| page_defaults.clone());
        for key in self.depends_on.iter() {
            ParameterValue::read(key, session).apply_to(&mut params);
        }
        params
    }

    /// Runs query and chart/tile construction for `params`.
    pub fn evaluate(
        &self,
        registry: &DatasetRegistry,
        params: &ParameterSet,
    ) -> DashResult<OutputContent> {
        let dataset = registry.get(&self.dataset)?;
        let view = query::query(dataset, &self.mapping, params)?;
        match &self.kind {
            OutputKind::Chart { options } => {
                chart::build(&view, params.chart_kind, options).map(OutputContent::from)
            }
            OutputKind::Summary { options } => {
                let category = params
                    .category
                    .as_deref()
                    .filter(|category| *category != self.mapping.category_all);
                Ok(OutputContent::Summary(query::summary_tiles(
                    &query::summarize(&view),
                    options,
                    category,
                )))
            }
        }
    }

    pub(crate) fn validate(&self) -> DashResult<()> {
        if self.id.trim().is_empty() {
            return Err(DashError::InvalidConfig("output id must not be empty".to_owned()));
        }
        if let Some(params) = &self.params {
            params.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum OutputContent {
    Chart(Box<ChartDescription>),
    Summary(Vec<Tile>),
}

impl From<ChartDescription> for OutputContent {
    fn from(chart: ChartDescription) -> Self {
        Self::Chart(Box::new(chart))
    }
}

impl OutputContent {
    #[must_use]
    pub fn as_chart(&self) -> Option<&ChartDescription> {
        match self {
            Self::Chart(chart) => Some(chart),
            Self::Summary(_) => None,
        }
    }

    #[must_use]
    pub fn as_tiles(&self) -> Option<&[Tile]> {
        match self {
            Self::Summary(tiles) => Some(tiles),
            Self::Chart(_) => None,
        }
    }
}

/// Recompute state of one output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OutputState {
    #[default]
    Idle,
    Recomputing,
    Failed { message: String },
}

impl OutputState {
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Result of one recomputation, pushed to the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputUpdate {
    pub output_id: String,
    pub state: OutputState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<OutputContent>,
}
