//! Shared harness for the integration tests: a minimal host environment
//! around a registry and a lifecycle source.
#![allow(dead_code)] // not every test binary uses every helper

use std::rc::Rc;

use statekeep::host::{HostId, LifecycleSource, StateHost};
use statekeep::registry::SavedStateRegistry;

pub struct Env {
    pub id: HostId,
    pub registry: Rc<SavedStateRegistry>,
    pub lifecycle: Rc<LifecycleSource>,
}

impl Env {
    pub fn new(registry: Rc<SavedStateRegistry>) -> Self {
        Self {
            id: HostId::fresh(),
            registry,
            lifecycle: Rc::new(LifecycleSource::new()),
        }
    }
}

impl StateHost for Env {
    fn host_id(&self) -> HostId {
        self.id
    }

    fn saved_state_registry(&self) -> Option<Rc<SavedStateRegistry>> {
        Some(Rc::clone(&self.registry))
    }

    fn lifecycle(&self) -> Option<Rc<LifecycleSource>> {
        Some(Rc::clone(&self.lifecycle))
    }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
