use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::core::DatasetRegistry;
use crate::error::{DashError, DashResult};
use crate::pages::PageConfig;
use crate::query::ParameterSet;

use super::keys::ParameterKey;
use super::observer::OutputObserver;
use super::output::{OutputBinding, OutputContent, OutputState, OutputUpdate};
use super::value::ParameterValue;

/// Current state and content of one bound output.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSlot {
    state: OutputState,
    content: Option<OutputContent>,
}

impl OutputSlot {
    #[must_use]
    pub fn state(&self) -> &OutputState {
        &self.state
    }

    #[must_use]
    pub fn content(&self) -> Option<&OutputContent> {
        self.content.as_ref()
    }
}

/// One viewer's parameter state over a page.
///
/// Sessions share the page and the datasets read-only and own everything
/// they mutate.
pub struct PageSession {
    page: Arc<PageConfig>,
    registry: Arc<DatasetRegistry>,
    params: ParameterSet,
    slots: IndexMap<String, OutputSlot>,
    observers: Vec<Box<dyn OutputObserver>>,
}

impl PageSession {
    /// Opens a session on the page defaults and renders every output once.
    #[must_use]
    pub fn open(page: Arc<PageConfig>, registry: Arc<DatasetRegistry>) -> Self {
        let params = page.defaults.clone();
        let mut session = Self {
            page,
            registry,
            params,
            slots: IndexMap::new(),
            observers: Vec::new(),
        };
        let page = Arc::clone(&session.page);
        for binding in &page.outputs {
            let update = session.recompute(binding);
            debug!(page = %page.id, output = %update.output_id, state = ?update.state, "initial render");
        }
        session
    }

    #[must_use]
    pub fn page(&self) -> &PageConfig {
        &self.page
    }

    #[must_use]
    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    #[must_use]
    pub fn output(&self, id: &str) -> Option<&OutputSlot> {
        self.slots.get(id)
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &OutputSlot)> {
        self.slots.iter().map(|(id, slot)| (id.as_str(), slot))
    }

    /// Current state of every output, in declaration order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<OutputUpdate> {
        self.slots
            .iter()
            .map(|(id, slot)| OutputUpdate {
                output_id: id.clone(),
                state: slot.state.clone(),
                content: slot.content.clone(),
            })
            .collect()
    }

    /// Sets one parameter and recomputes every output depending on it.
    ///
    /// Setting a parameter to its current value recomputes nothing. Errors
    /// while recomputing never escape: the affected output turns `Failed`.
    pub fn apply(&mut self, value: ParameterValue) -> Vec<OutputUpdate> {
        let key = value.key();
        if !value.apply_to(&mut self.params) {
            debug!(page = %self.page.id, key = %key, "parameter unchanged");
            return Vec::new();
        }

        let page = Arc::clone(&self.page);
        let updates: Vec<OutputUpdate> = page
            .outputs
            .iter()
            .filter(|binding| binding.depends_on.contains_key(key))
            .map(|binding| self.recompute(binding))
            .collect();

        for update in &updates {
            for observer in &mut self.observers {
                observer.on_update(update);
            }
        }
        debug!(page = %page.id, key = %key, recomputed = updates.len(), "parameter applied");
        updates
    }

    /// Parses a textual control value and applies it.
    pub fn apply_raw(&mut self, key: &str, raw: &str) -> DashResult<Vec<OutputUpdate>> {
        let key: ParameterKey = key.parse()?;
        Ok(self.apply(ParameterValue::parse(key, raw)?))
    }

    fn recompute(&mut self, binding: &OutputBinding) -> OutputUpdate {
        let slot = self
            .slots
            .entry(binding.id.clone())
            .or_insert_with(|| OutputSlot {
                state: OutputState::Idle,
                content: None,
            });
        slot.state = OutputState::Recomputing;

        let params = binding.effective_params(&self.page.defaults, &self.params);
        match binding.evaluate(&self.registry, &params) {
            Ok(content) => {
                slot.state = OutputState::Idle;
                slot.content = Some(content);
            }
            Err(err) => {
                warn!(page = %self.page.id, output = %binding.id, error = %err, "output recompute failed");
                slot.state = OutputState::Failed {
                    message: err.to_string(),
                };
                slot.content = None;
            }
        }

        OutputUpdate {
            output_id: binding.id.clone(),
            state: slot.state.clone(),
            content: slot.content.clone(),
        }
    }

    pub fn register_observer(&mut self, observer: Box<dyn OutputObserver>) -> DashResult<()> {
        let observer_id = observer.id().to_owned();
        if observer_id.is_empty() {
            return Err(DashError::InvalidConfig(
                "observer id must not be empty".to_owned(),
            ));
        }
        if self.has_observer(&observer_id) {
            return Err(DashError::InvalidConfig(format!(
                "observer with id `{observer_id}` is already registered"
            )));
        }
        self.observers.push(observer);
        Ok(())
    }

    /// Unregisters an observer by id. Returns `true` when removed.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        if let Some(position) = self
            .observers
            .iter()
            .position(|entry| entry.id() == observer_id)
        {
            self.observers.remove(position);
            return true;
        }
        false
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers.iter().any(|entry| entry.id() == observer_id)
    }
}
