use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::binding::OutputBinding;
use crate::core::{DatasetId, DatasetSpec};
use crate::error::{DashError, DashResult};
use crate::query::ParameterSet;

/// Declarative dashboard page: default parameters and bound outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub defaults: ParameterSet,
    pub outputs: Vec<OutputBinding>,
}

impl PageConfig {
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            defaults: ParameterSet::default(),
            outputs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_defaults(mut self, defaults: ParameterSet) -> Self {
        self.defaults = defaults;
        self
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputBinding) -> Self {
        self.outputs.push(output);
        self
    }

    /// Datasets referenced by the page's outputs, in first-use order.
    #[must_use]
    pub fn datasets(&self) -> IndexSet<&DatasetId> {
        self.outputs.iter().map(|output| &output.dataset).collect()
    }

    pub fn validate(&self) -> DashResult<()> {
        if self.id.trim().is_empty() {
            return Err(DashError::InvalidConfig("page id must not be empty".to_owned()));
        }
        self.defaults
            .validate()
            .map_err(|e| DashError::InvalidConfig(format!("page `{}` defaults: {e}", self.id)))?;

        let mut seen = IndexSet::new();
        for output in &self.outputs {
            output
                .validate()
                .map_err(|e| DashError::InvalidConfig(format!("page `{}`: {e}", self.id)))?;
            if !seen.insert(output.id.as_str()) {
                return Err(DashError::InvalidConfig(format!(
                    "page `{}` declares output `{}` twice",
                    self.id, output.id
                )));
            }
        }
        Ok(())
    }
}

/// Datasets and pages of a dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Root for relative dataset paths; the working directory when absent.
    #[serde(default)]
    pub data_root: Option<PathBuf>,
    pub datasets: Vec<DatasetSpec>,
    pub pages: Vec<PageConfig>,
}

impl DashboardConfig {
    pub fn to_json_pretty(&self) -> DashResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            DashError::InvalidConfig(format!("failed to serialize dashboard config: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> DashResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            DashError::InvalidConfig(format!("failed to parse dashboard config: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON config file. A relative `data_root` resolves against the
    /// file's directory; an absent one becomes that directory.
    pub fn from_path(path: impl AsRef<Path>) -> DashResult<Self> {
        let path = path.as_ref();
        let input = fs::read_to_string(path).map_err(|e| {
            DashError::InvalidConfig(format!("failed to read `{}`: {e}", path.display()))
        })?;
        let mut config = Self::from_json_str(&input)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        config.data_root = Some(match config.data_root.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => base.join(root),
            None => base.to_path_buf(),
        });
        Ok(config)
    }

    #[must_use]
    pub fn data_root(&self) -> &Path {
        self.data_root.as_deref().unwrap_or_else(|| Path::new(""))
    }

    #[must_use]
    pub fn page(&self, id: &str) -> Option<&PageConfig> {
        self.pages.iter().find(|page| page.id == id)
    }

    /// Checks id uniqueness and that pages only reference declared datasets.
    pub fn validate(&self) -> DashResult<()> {
        let mut datasets = IndexSet::new();
        for spec in &self.datasets {
            if spec.id.as_str().trim().is_empty() {
                return Err(DashError::InvalidConfig("dataset id must not be empty".to_owned()));
            }
            if !datasets.insert(&spec.id) {
                return Err(DashError::InvalidConfig(format!(
                    "dataset `{}` declared twice",
                    spec.id
                )));
            }
        }

        let mut pages = IndexSet::new();
        for page in &self.pages {
            page.validate()?;
            if !pages.insert(page.id.as_str()) {
                return Err(DashError::InvalidConfig(format!(
                    "page `{}` declared twice",
                    page.id
                )));
            }
            if let Some(missing) = page.datasets().into_iter().find(|id| !datasets.contains(id)) {
                return Err(DashError::InvalidConfig(format!(
                    "page `{}` references undeclared dataset `{missing}`",
                    page.id
                )));
            }
        }
        Ok(())
    }
}
