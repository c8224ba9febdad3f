use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DashError, DashResult};

/// Stable identifier of a loaded dataset inside a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatasetId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for DatasetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Inclusive year interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> DashResult<Self> {
        if min > max {
            return Err(DashError::InvalidData(format!(
                "year range min {min} must be <= max {max}"
            )));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn contains(self, year: i32) -> bool {
        year >= self.min && year <= self.max
    }
}

/// Inclusive numeric interval applied to the primary measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> DashResult<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(DashError::InvalidData(format!(
                "value range must be finite with min <= max (got {min}..{max})"
            )));
        }
        Ok(Self { min, max })
    }

    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

impl DataPoint {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Chart family requested by a parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ChartKind {
    #[default]
    #[serde(rename = "time_series")]
    TimeSeries,
    #[serde(rename = "choropleth")]
    Choropleth,
    #[serde(rename = "bar")]
    Bar,
    #[serde(rename = "stacked_bar")]
    StackedBar,
    #[serde(rename = "scatter")]
    Scatter,
    #[serde(rename = "spiral_3d")]
    Spiral3d,
}

impl ChartKind {
    pub const ALL: [Self; 6] = [
        Self::TimeSeries,
        Self::Choropleth,
        Self::Bar,
        Self::StackedBar,
        Self::Scatter,
        Self::Spiral3d,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TimeSeries => "time_series",
            Self::Choropleth => "choropleth",
            Self::Bar => "bar",
            Self::StackedBar => "stacked_bar",
            Self::Scatter => "scatter",
            Self::Spiral3d => "spiral_3d",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChartKind {
    type Err = DashError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == input.trim())
            .ok_or_else(|| DashError::InvalidParameter {
                key: "chart_kind".to_owned(),
                reason: format!("unknown chart kind `{input}`"),
            })
    }
}
