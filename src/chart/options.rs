use serde::{Deserialize, Serialize};

use crate::query::FilteredView;

use super::description::{BarMode, LocationMode, Orientation, TraceMode};

/// Field plotted on the x axis of line and scatter charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XField {
    #[default]
    Year,
    /// Month of year, 1..=12, labelled with month abbreviations.
    Month,
    /// The mapping's `x_measure` column.
    Measure,
}

/// How line and scatter charts split rows into series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesLayout {
    /// One series per entity, valued by the measure.
    #[default]
    PerEntity,
    /// One series per component column.
    PerComponent,
    /// A single series holding every row, with entity hover text and the
    /// optional size and color channels.
    Combined,
}

/// Geometry of the climate spiral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpiralOptions {
    pub min_anomaly: f64,
    pub max_anomaly: f64,
    pub radius_scale: f64,
    /// Radius of the month marker ring; labels sit 10% further out.
    pub label_radius: f64,
    /// Anomaly levels drawn as reference rings.
    pub reference_levels: Vec<f64>,
}

impl Default for SpiralOptions {
    fn default() -> Self {
        Self {
            min_anomaly: -0.81,
            max_anomaly: 1.48,
            radius_scale: 10.0,
            label_radius: 15.0,
            reference_levels: vec![-0.5, 0.0, 1.0],
        }
    }
}

/// Presentation choices of one chart output.
///
/// `title` may contain `{year}`, replaced with the latest year in the view,
/// and `{entity}`, replaced with the first series entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub x_field: XField,
    pub series_layout: SeriesLayout,
    /// Overrides the kind's default trace mode for line and scatter charts.
    pub line_mode: Option<TraceMode>,
    pub location_mode: LocationMode,
    pub color_scale: Option<String>,
    /// Fixed color domain; wins over the view's percentile range.
    pub color_range: Option<(f64, f64)>,
    /// Per-component colors, matched by position.
    pub component_colors: Vec<String>,
    pub bar_mode: BarMode,
    pub orientation: Orientation,
    pub spiral: SpiralOptions,
    pub log_x: bool,
    pub log_y: bool,
}

impl ChartOptions {
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_axis_titles(mut self, x_title: impl Into<String>, y_title: impl Into<String>) -> Self {
        self.x_title = x_title.into();
        self.y_title = y_title.into();
        self
    }

    #[must_use]
    pub fn with_x_field(mut self, x_field: XField) -> Self {
        self.x_field = x_field;
        self
    }

    #[must_use]
    pub fn with_series_layout(mut self, layout: SeriesLayout) -> Self {
        self.series_layout = layout;
        self
    }

    #[must_use]
    pub fn with_line_mode(mut self, mode: TraceMode) -> Self {
        self.line_mode = Some(mode);
        self
    }

    #[must_use]
    pub fn with_location_mode(mut self, mode: LocationMode) -> Self {
        self.location_mode = mode;
        self
    }

    #[must_use]
    pub fn with_color_scale(mut self, scale: impl Into<String>) -> Self {
        self.color_scale = Some(scale.into());
        self
    }

    #[must_use]
    pub fn with_color_range(mut self, min: f64, max: f64) -> Self {
        self.color_range = Some((min, max));
        self
    }

    #[must_use]
    pub fn with_component_colors<I, S>(mut self, colors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.component_colors = colors.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_bar_mode(mut self, mode: BarMode) -> Self {
        self.bar_mode = mode;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    #[must_use]
    pub fn with_log_axes(mut self, log_x: bool, log_y: bool) -> Self {
        self.log_x = log_x;
        self.log_y = log_y;
        self
    }

    #[must_use]
    pub fn with_spiral(mut self, spiral: SpiralOptions) -> Self {
        self.spiral = spiral;
        self
    }

    pub(crate) fn resolved_title(&self, view: &FilteredView) -> String {
        if !self.title.contains("{year}") && !self.title.contains("{entity}") {
            return self.title.clone();
        }
        let year = view
            .years()
            .last()
            .map(ToString::to_string)
            .unwrap_or_default();
        let entity = view.entity_order.first().map_or("", String::as_str);
        self.title
            .replace("{year}", &year)
            .replace("{entity}", entity)
            .trim()
            .to_owned()
    }

    pub(crate) fn color_scale_or(&self, fallback: &str) -> String {
        self.color_scale
            .clone()
            .unwrap_or_else(|| fallback.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::ChartOptions;
    use crate::core::DatasetId;
    use crate::query::{FilteredView, ViewRow};

    fn view(rows: &[(&str, i32)]) -> FilteredView {
        let mut view = FilteredView::empty(DatasetId::new("t"), "CO2");
        for (entity, year) in rows {
            view.rows.push(ViewRow::new(*entity, Some(*year), Some(1.0)));
            view.entity_order.push((*entity).to_owned());
        }
        view
    }

    #[test]
    fn title_placeholders() {
        let options = ChartOptions::titled("Spiral {year}");
        assert_eq!(
            options.resolved_title(&view(&[("1880", 1880), ("2023", 2023)])),
            "Spiral 2023"
        );
        assert_eq!(options.resolved_title(&view(&[])), "Spiral");

        let trend = ChartOptions::titled("Trend - {entity}");
        assert_eq!(trend.resolved_title(&view(&[("India", 2000)])), "Trend - India");
        assert_eq!(
            ChartOptions::titled("Plain").resolved_title(&view(&[("A", 1)])),
            "Plain"
        );
    }
}
