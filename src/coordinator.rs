//! Per-host aggregation of saved fields.
//!
//! One [`HostCoordinator`] exists per live host. It owns the set of save
//! sources (delegate cells plus at most one static-fields source), bridges
//! them to the host's [`SavedStateRegistry`], memoizes the destructive
//! restore-payload consumption, and removes itself from the process-wide map
//! when the host's lifecycle fires its terminal event.
//!
//! The host→coordinator map is a `thread_local`; the whole protocol is
//! single-threaded on the host's owning thread.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::errors::{StatekeepError, StatekeepResult};
use crate::host::{HostId, StateHost};
use crate::record::Record;
use crate::registry::SaveProvider;

/// Anything that can contribute entries to a host's save record.
pub trait SaveSource {
    fn save_into(&self, record: &mut Record) -> StatekeepResult<()>;
}

thread_local! {
    static COORDINATORS: RefCell<HashMap<HostId, Rc<HostCoordinator>>> =
        RefCell::new(HashMap::new());
}

pub struct HostCoordinator {
    host_id: HostId,
    storage_key: String,
    restored: Cell<bool>,
    cache: RefCell<Option<Record>>,
    sources: RefCell<Vec<Rc<dyn SaveSource>>>,
}

impl HostCoordinator {
    /// Get or create the coordinator for `host`.
    ///
    /// The first registration wires everything up: the coordinator becomes
    /// the registry's save provider under the configured coordinator key and
    /// subscribes to the lifecycle terminal event, which later unregisters
    /// the provider and releases the host id from the map. Subsequent calls
    /// return the existing coordinator.
    pub fn register(host: &dyn StateHost) -> StatekeepResult<Rc<Self>> {
        let registry = host
            .saved_state_registry()
            .ok_or(StatekeepError::UnsupportedHost)?;
        let lifecycle = host.lifecycle().ok_or(StatekeepError::UnsupportedHost)?;
        let host_id = host.host_id();

        if let Some(existing) = Self::lookup(host_id) {
            return Ok(existing);
        }

        let storage_key = registry.config().coordinator_key.clone();
        let coordinator = Rc::new(Self {
            host_id,
            storage_key: storage_key.clone(),
            restored: Cell::new(false),
            cache: RefCell::new(None),
            sources: RefCell::new(Vec::new()),
        });
        COORDINATORS.with_borrow_mut(|map| map.insert(host_id, Rc::clone(&coordinator)));
        registry.register_save_provider(
            storage_key.clone(),
            Rc::clone(&coordinator) as Rc<dyn SaveProvider>,
        );

        let dispose_registry = Rc::clone(&registry);
        lifecycle.subscribe(move || {
            log::debug!("{host_id} disposed; releasing its coordinator");
            dispose_registry.unregister_save_provider(&storage_key);
            COORDINATORS.with_borrow_mut(|map| {
                map.remove(&host_id);
            });
        });

        log::debug!("registered coordinator for {host_id}");
        Ok(coordinator)
    }

    #[must_use]
    pub fn lookup(host_id: HostId) -> Option<Rc<Self>> {
        COORDINATORS.with_borrow(|map| map.get(&host_id).cloned())
    }

    #[must_use]
    pub fn is_registered(host_id: HostId) -> bool {
        COORDINATORS.with_borrow(|map| map.contains_key(&host_id))
    }

    #[must_use]
    pub fn host_id(&self) -> HostId {
        self.host_id
    }

    /// Whether the registry's destructive consume has already happened.
    #[must_use]
    pub fn restore_consumed(&self) -> bool {
        self.restored.get()
    }

    /// Add a save source. Set semantics: a source already present (by
    /// pointer identity) is not added twice.
    pub fn add_source(&self, source: Rc<dyn SaveSource>) {
        let mut sources = self.sources.borrow_mut();
        if !sources.iter().any(|existing| Rc::ptr_eq(existing, &source)) {
            sources.push(source);
        }
    }

    /// Pull the restore payload from the registry if that has not happened
    /// yet. The registry consume is destructive, so it runs at most once per
    /// host lifetime; every later read is served from the cache.
    pub fn prime_restore(&self, host: &dyn StateHost) -> StatekeepResult<()> {
        if self.restored.get() {
            return Ok(());
        }
        let registry = host
            .saved_state_registry()
            .ok_or(StatekeepError::UnsupportedHost)?;
        let payload = registry.consume_restored_state(&self.storage_key);
        log::debug!(
            "{}: restore payload {}",
            self.host_id,
            if payload.is_some() { "cached" } else { "absent" }
        );
        *self.cache.borrow_mut() = payload;
        self.restored.set(true);
        Ok(())
    }

    /// Consume `key` from the cached restore payload, priming the cache on
    /// first use.
    pub fn consume_restored(
        &self,
        host: &dyn StateHost,
        key: &str,
    ) -> StatekeepResult<Option<crate::value::StateValue>> {
        self.prime_restore(host)?;
        Ok(self
            .cache
            .borrow_mut()
            .as_mut()
            .and_then(|record| record.remove(key)))
    }

    /// Run `f` over the cached restore payload. Callers prime the cache
    /// first; an unprimed or empty cache shows up as `None`.
    pub fn with_restore_payload<R>(&self, f: impl FnOnce(Option<&mut Record>) -> R) -> R {
        f(self.cache.borrow_mut().as_mut())
    }

    /// Build a fresh save record from every registered source. The stale
    /// restore cache is dropped first; state captured now supersedes it.
    pub fn save_record(&self) -> StatekeepResult<Record> {
        self.cache.borrow_mut().take();
        let sources = self.sources.borrow().clone();
        let mut record = Record::new();
        for source in &sources {
            source.save_into(&mut record)?;
        }
        log::debug!("{}: saved {} entr(ies)", self.host_id, record.len());
        Ok(record)
    }
}

impl SaveProvider for HostCoordinator {
    fn save_state(&self) -> StatekeepResult<Record> {
        self.save_record()
    }
}

impl std::fmt::Debug for HostCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostCoordinator")
            .field("host_id", &self.host_id)
            .field("storage_key", &self.storage_key)
            .field("restored", &self.restored.get())
            .field("sources", &self.sources.borrow().len())
            .finish()
    }
}
