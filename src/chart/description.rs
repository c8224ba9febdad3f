use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, DataPoint, Point3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    Lines,
    Markers,
    LinesMarkers,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    #[default]
    Stack,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationMode {
    /// ISO-3166 alpha-3 codes from the mapped code column.
    #[default]
    Iso3,
    /// Entity names matched by the renderer's country-name lookup.
    CountryNames,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineTrace {
    pub name: String,
    pub mode: TraceMode,
    pub points: Vec<DataPoint>,
    /// Hover text per point.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marker_sizes: Vec<f64>,
    /// Values mapped through the layout's color axis.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marker_colors: Vec<f64>,
}

impl LineTrace {
    #[must_use]
    pub fn new(name: impl Into<String>, mode: TraceMode, points: Vec<DataPoint>) -> Self {
        Self {
            name: name.into(),
            mode,
            points,
            text: Vec::new(),
            marker_sizes: Vec::new(),
            marker_colors: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarTrace {
    pub name: String,
    pub orientation: Orientation,
    pub categories: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoroplethTrace {
    pub name: String,
    pub location_mode: LocationMode,
    pub locations: Vec<String>,
    pub hover_names: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scatter3dTrace {
    pub name: String,
    pub mode: TraceMode,
    pub points: Vec<Point3>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub show_legend: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Trace {
    Line(LineTrace),
    Bar(BarTrace),
    Choropleth(ChoroplethTrace),
    Scatter3d(Scatter3dTrace),
}

impl Trace {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Line(trace) => &trace.name,
            Self::Bar(trace) => &trace.name,
            Self::Choropleth(trace) => &trace.name,
            Self::Scatter3d(trace) => &trace.name,
        }
    }

    #[must_use]
    pub fn as_line(&self) -> Option<&LineTrace> {
        match self {
            Self::Line(trace) => Some(trace),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bar(&self) -> Option<&BarTrace> {
        match self {
            Self::Bar(trace) => Some(trace),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_choropleth(&self) -> Option<&ChoroplethTrace> {
        match self {
            Self::Choropleth(trace) => Some(trace),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_scatter3d(&self) -> Option<&Scatter3dTrace> {
        match self {
            Self::Scatter3d(trace) => Some(trace),
            _ => None,
        }
    }
}

/// Animation frame, one per year on multi-year maps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub name: String,
    pub traces: Vec<Trace>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Axis {
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tick_values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tick_labels: Vec<String>,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub log_scale: bool,
}

impl Axis {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tick_values: Vec::new(),
            tick_labels: Vec::new(),
            visible: true,
            log_scale: false,
        }
    }

    #[must_use]
    pub fn with_log_scale(mut self, log_scale: bool) -> Self {
        self.log_scale = log_scale;
        self
    }

    #[must_use]
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Self::default()
        }
    }
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorAxis {
    pub scale: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_axis: Option<Axis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_axis: Option<ColorAxis>,
    pub show_legend: bool,
}

/// Declarative chart handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDescription {
    pub kind: ChartKind,
    pub traces: Vec<Trace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
    pub layout: Layout,
}

impl ChartDescription {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    #[must_use]
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.traces.iter().find(|trace| trace.name() == name)
    }

    pub fn trace_names(&self) -> impl Iterator<Item = &str> {
        self.traces.iter().map(Trace::name)
    }
}
