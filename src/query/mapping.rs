use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Component columns of a stacked or multi-measure chart, in drawing order.
pub type ComponentColumns = SmallVec<[String; 6]>;

/// Binds the generic query roles to concrete dataset columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default = "default_entity")]
    pub entity: String,
    #[serde(default = "default_year")]
    pub year: Option<String>,
    pub measure: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub month: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Category value that disables the category filter.
    #[serde(default = "default_category_all")]
    pub category_all: String,
    #[serde(default)]
    pub components: ComponentColumns,
    #[serde(default)]
    pub total: Option<String>,
    /// Keeps only rows whose code is an ISO-3 country code.
    #[serde(default)]
    pub require_code: bool,
    #[serde(default)]
    pub x_measure: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl ColumnMapping {
    /// Mapping with the common `Entity`/`Year` layout.
    #[must_use]
    pub fn new(measure: impl Into<String>) -> Self {
        Self {
            entity: default_entity(),
            year: default_year(),
            measure: measure.into(),
            code: None,
            month: None,
            category: None,
            category_all: default_category_all(),
            components: SmallVec::new(),
            total: None,
            require_code: false,
            x_measure: None,
            size: None,
            color: None,
        }
    }

    #[must_use]
    pub fn with_entity(mut self, column: impl Into<String>) -> Self {
        self.entity = column.into();
        self
    }

    #[must_use]
    pub fn with_year(mut self, column: impl Into<String>) -> Self {
        self.year = Some(column.into());
        self
    }

    #[must_use]
    pub fn without_year(mut self) -> Self {
        self.year = None;
        self
    }

    #[must_use]
    pub fn with_code(mut self, column: impl Into<String>) -> Self {
        self.code = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_month(mut self, column: impl Into<String>) -> Self {
        self.month = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, column: impl Into<String>) -> Self {
        self.category = Some(column.into());
        self
    }

    #[must_use]
    pub fn with_components<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.components = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn countries_only(mut self) -> Self {
        self.require_code = true;
        self
    }

    #[must_use]
    pub fn with_total(mut self, column: impl Into<String>) -> Self {
        self.total = Some(column.into());
        self
    }

    /// Numeric column plotted against the measure on the x axis.
    #[must_use]
    pub fn with_x_measure(mut self, column: impl Into<String>) -> Self {
        self.x_measure = Some(column.into());
        self
    }

    /// Numeric column sizing scatter markers.
    #[must_use]
    pub fn with_size(mut self, column: impl Into<String>) -> Self {
        self.size = Some(column.into());
        self
    }

    /// Numeric column coloring scatter markers on a continuous scale.
    #[must_use]
    pub fn with_color(mut self, column: impl Into<String>) -> Self {
        self.color = Some(column.into());
        self
    }
}

fn default_entity() -> String {
    "Entity".to_owned()
}

#[allow(clippy::unnecessary_wraps)]
fn default_year() -> Option<String> {
    Some("Year".to_owned())
}

fn default_category_all() -> String {
    "World".to_owned()
}
