//! In-memory saved-state container: the persistence collaborator hosts hand
//! to the crate.
//!
//! The registry keeps restorable state keyed by provider key and collects
//! fresh state from registered save providers at capture time. What happens
//! to a captured snapshot between [`capture`](SavedStateRegistry::capture)
//! and [`inject`](SavedStateRegistry::inject) — disk, process handoff,
//! nothing at all — is outside this crate's contract.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::config::RegistryConfig;
use crate::errors::StatekeepResult;
use crate::record::Record;
use crate::value::StateValue;

/// Producer side of the save hook. The per-host coordinator implements this;
/// custom providers can too.
pub trait SaveProvider {
    fn save_state(&self) -> StatekeepResult<Record>;
}

/// One host's saved-state container.
///
/// Restored entries are handed out destructively: the first
/// [`consume_restored_state`](Self::consume_restored_state) for a key removes
/// the entry, which is why the coordinator caches the result.
#[derive(Default)]
pub struct SavedStateRegistry {
    config: RegistryConfig,
    restored: RefCell<HashMap<String, Record>>,
    providers: RefCell<Vec<(String, Rc<dyn SaveProvider>)>>,
}

impl SavedStateRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Destructive single read of the restored record under `key`.
    pub fn consume_restored_state(&self, key: &str) -> Option<Record> {
        let consumed = self.restored.borrow_mut().remove(key);
        log::debug!(
            "consume_restored_state `{key}`: {}",
            if consumed.is_some() { "hit" } else { "miss" }
        );
        consumed
    }

    /// Register `provider` under `key`, replacing any previous provider for
    /// the same key.
    pub fn register_save_provider(&self, key: impl Into<String>, provider: Rc<dyn SaveProvider>) {
        let key = key.into();
        let mut providers = self.providers.borrow_mut();
        if let Some(slot) = providers.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = provider;
        } else {
            providers.push((key, provider));
        }
    }

    pub fn unregister_save_provider(&self, key: &str) {
        self.providers.borrow_mut().retain(|(k, _)| k != key);
    }

    /// Ask every registered provider for its state and assemble the combined
    /// snapshot, one nested record per provider key. Providers that report an
    /// empty record are skipped when the config says so.
    pub fn capture(&self) -> StatekeepResult<Record> {
        let providers = self.providers.borrow().clone();
        let mut snapshot = Record::new();
        for (key, provider) in providers {
            let record = provider.save_state()?;
            if record.is_empty() && self.config.drop_empty_records {
                log::debug!("capture: dropping empty record for `{key}`");
                continue;
            }
            snapshot.put(key, StateValue::Nested(record));
        }
        Ok(snapshot)
    }

    /// Seed this registry with a previously captured snapshot, making its
    /// nested records available for consumption. Non-record entries are not
    /// meaningful in a snapshot and are dropped with a warning.
    pub fn inject(&self, snapshot: Record) {
        let mut restored = self.restored.borrow_mut();
        for (key, value) in snapshot {
            match value {
                StateValue::Nested(record) => {
                    restored.insert(key, record);
                }
                other => {
                    log::warn!(
                        "inject: dropping non-record entry `{key}` of shape {}",
                        other.kind_name()
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for SavedStateRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SavedStateRegistry")
            .field("config", &self.config)
            .field("restored", &self.restored.borrow().len())
            .field("providers", &self.providers.borrow().len())
            .finish()
    }
}
