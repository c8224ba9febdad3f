use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, ValueRange, YearRange};
use crate::error::{DashError, DashResult};
use crate::query::ParameterSet;

use super::keys::ParameterKey;

/// Typed value carried by a parameter event.
///
/// `None` clears an optional parameter; an empty entity list selects all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    Entities(Vec<String>),
    Year(Option<i32>),
    YearRange(Option<YearRange>),
    ValueRange(Option<ValueRange>),
    ChartKind(ChartKind),
    Category(Option<String>),
}

impl ParameterValue {
    #[must_use]
    pub fn key(&self) -> ParameterKey {
        match self {
            Self::Entities(_) => ParameterKey::Entities,
            Self::Year(_) => ParameterKey::Year,
            Self::YearRange(_) => ParameterKey::YearRange,
            Self::ValueRange(_) => ParameterKey::ValueRange,
            Self::ChartKind(_) => ParameterKey::ChartKind,
            Self::Category(_) => ParameterKey::Category,
        }
    }

    /// Parses the textual value of a control.
    ///
    /// Entities are `|`-separated, ranges use `min..max`, and an empty string
    /// clears optional values.
    pub fn parse(key: ParameterKey, raw: &str) -> DashResult<Self> {
        let raw = raw.trim();
        let invalid = |reason: String| DashError::InvalidParameter {
            key: key.as_str().to_owned(),
            reason,
        };

        match key {
            ParameterKey::Entities => Ok(Self::Entities(
                raw.split('|')
                    .map(str::trim)
                    .filter(|entity| !entity.is_empty())
                    .map(str::to_owned)
                    .collect(),
            )),
            ParameterKey::Year => {
                if raw.is_empty() {
                    return Ok(Self::Year(None));
                }
                raw.parse::<i32>()
                    .map(|year| Self::Year(Some(year)))
                    .map_err(|e| invalid(format!("`{raw}` is not a year: {e}")))
            }
            ParameterKey::YearRange => {
                if raw.is_empty() {
                    return Ok(Self::YearRange(None));
                }
                let (min, max) = split_range(raw).ok_or_else(|| {
                    invalid(format!("`{raw}` is not a `min..max` range"))
                })?;
                let min = min
                    .parse::<i32>()
                    .map_err(|e| invalid(format!("bad range start `{min}`: {e}")))?;
                let max = max
                    .parse::<i32>()
                    .map_err(|e| invalid(format!("bad range end `{max}`: {e}")))?;
                let range = YearRange::new(min, max).map_err(|e| invalid(e.to_string()))?;
                Ok(Self::YearRange(Some(range)))
            }
            ParameterKey::ValueRange => {
                if raw.is_empty() {
                    return Ok(Self::ValueRange(None));
                }
                let (min, max) = split_range(raw).ok_or_else(|| {
                    invalid(format!("`{raw}` is not a `min..max` range"))
                })?;
                let min = min
                    .parse::<f64>()
                    .map_err(|e| invalid(format!("bad range start `{min}`: {e}")))?;
                let max = max
                    .parse::<f64>()
                    .map_err(|e| invalid(format!("bad range end `{max}`: {e}")))?;
                let range = ValueRange::new(min, max).map_err(|e| invalid(e.to_string()))?;
                Ok(Self::ValueRange(Some(range)))
            }
            ParameterKey::ChartKind => raw.parse::<ChartKind>().map(Self::ChartKind),
            ParameterKey::Category => Ok(Self::Category(
                (!raw.is_empty()).then(|| raw.to_owned()),
            )),
        }
    }

    /// Writes the value into `params`. Returns `true` when anything changed.
    pub fn apply_to(self, params: &mut ParameterSet) -> bool {
        match self {
            Self::Entities(entities) => {
                // Selection order matters for series order.
                if params.entities.iter().eq(entities.iter()) {
                    return false;
                }
                params.entities = entities.into_iter().collect();
                true
            }
            Self::Year(year) => replace(&mut params.year, year),
            Self::YearRange(range) => replace(&mut params.year_range, range),
            Self::ValueRange(range) => replace(&mut params.value_range, range),
            Self::ChartKind(kind) => replace(&mut params.chart_kind, kind),
            Self::Category(category) => replace(&mut params.category, category),
        }
    }

    /// Reads the current value of `key` from `params`.
    #[must_use]
    pub fn read(key: ParameterKey, params: &ParameterSet) -> Self {
        match key {
            ParameterKey::Entities => Self::Entities(params.entities.iter().cloned().collect()),
            ParameterKey::Year => Self::Year(params.year),
            ParameterKey::YearRange => Self::YearRange(params.year_range),
            ParameterKey::ValueRange => Self::ValueRange(params.value_range),
            ParameterKey::ChartKind => Self::ChartKind(params.chart_kind),
            ParameterKey::Category => Self::Category(params.category.clone()),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

fn split_range(raw: &str) -> Option<(&str, &str)> {
    let (min, max) = raw.split_once("..")?;
    Some((min.trim(), max.trim()))
}
