use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::binding::PageSession;
use crate::core::{DatasetId, DatasetRegistry, load_spec};
use crate::error::{DashError, DashResult};
use crate::pages::{DashboardConfig, PageConfig};

/// Page that could not be served and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailablePage {
    pub page: String,
    pub reason: String,
}

/// Loaded datasets plus the pages they serve.
///
/// Built once at startup; sessions opened from it share the datasets
/// read-only.
pub struct Dashboard {
    registry: Arc<DatasetRegistry>,
    pages: IndexMap<String, Arc<PageConfig>>,
    unavailable: IndexMap<String, UnavailablePage>,
}

impl Dashboard {
    /// Loads every declared dataset once.
    ///
    /// A dataset that fails to load makes every page using it unavailable;
    /// the remaining pages keep working.
    pub fn load(config: &DashboardConfig) -> DashResult<Self> {
        config.validate()?;

        let mut registry = DatasetRegistry::new();
        let mut failed: IndexMap<&DatasetId, String> = IndexMap::new();
        for spec in &config.datasets {
            match load_spec(spec, config.data_root()) {
                Ok(dataset) => {
                    registry.insert(dataset)?;
                }
                Err(err) => {
                    error!(dataset = %spec.id, error = %err, "dataset failed to load");
                    failed.insert(&spec.id, err.to_string());
                }
            }
        }

        let mut pages = IndexMap::new();
        let mut unavailable = IndexMap::new();
        for page in &config.pages {
            let broken = page
                .datasets()
                .into_iter()
                .find_map(|id| failed.get(id).map(|reason| (id, reason)));
            match broken {
                Some((id, reason)) => {
                    error!(page = %page.id, dataset = %id, "page unavailable");
                    unavailable.insert(
                        page.id.clone(),
                        UnavailablePage {
                            page: page.id.clone(),
                            reason: format!("dataset `{id}` failed to load: {reason}"),
                        },
                    );
                }
                None => {
                    pages.insert(page.id.clone(), Arc::new(page.clone()));
                }
            }
        }

        info!(
            datasets = registry.len(),
            failed_datasets = failed.len(),
            pages = pages.len(),
            unavailable_pages = unavailable.len(),
            "dashboard loaded"
        );
        Ok(Self {
            registry: Arc::new(registry),
            pages,
            unavailable,
        })
    }

    /// Opens an isolated session on `page_id` with the page defaults applied.
    pub fn open_session(&self, page_id: &str) -> DashResult<PageSession> {
        if let Some(page) = self.pages.get(page_id) {
            return Ok(PageSession::open(
                Arc::clone(page),
                Arc::clone(&self.registry),
            ));
        }
        match self.unavailable.get(page_id) {
            Some(entry) => Err(DashError::PageUnavailable {
                page: entry.page.clone(),
                reason: entry.reason.clone(),
            }),
            None => Err(DashError::UnknownPage(page_id.to_owned())),
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    pub fn available_pages(&self) -> impl Iterator<Item = &PageConfig> {
        self.pages.values().map(AsRef::as_ref)
    }

    pub fn unavailable_pages(&self) -> impl Iterator<Item = &UnavailablePage> {
        self.unavailable.values()
    }

    #[must_use]
    pub fn is_available(&self, page_id: &str) -> bool {
        self.pages.contains_key(page_id)
    }
}
