use std::sync::Arc;

use indexmap::IndexMap;

use crate::core::dataset::Dataset;
use crate::core::types::DatasetId;
use crate::error::{DashError, DashResult};

/// Read-only set of datasets loaded at startup.
///
/// Datasets are handed out as `Arc<Dataset>` so any number of sessions can
/// query them without locking.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    datasets: IndexMap<DatasetId, Arc<Dataset>>,
}

impl DatasetRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset under its own id. Ids must be unique.
    pub fn insert(&mut self, dataset: Dataset) -> DashResult<Arc<Dataset>> {
        let id = dataset.id().clone();
        if self.datasets.contains_key(&id) {
            return Err(DashError::InvalidConfig(format!(
                "dataset `{id}` is already registered"
            )));
        }
        let dataset = Arc::new(dataset);
        self.datasets.insert(id, Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn get(&self, id: &DatasetId) -> DashResult<&Arc<Dataset>> {
        self.datasets
            .get(id)
            .ok_or_else(|| DashError::UnknownDataset(id.to_string()))
    }

    #[must_use]
    pub fn contains(&self, id: &DatasetId) -> bool {
        self.datasets.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &DatasetId> {
        self.datasets.keys()
    }
}
