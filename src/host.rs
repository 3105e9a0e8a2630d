//! Host identity and the external collaborator contracts a host must expose.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::registry::SavedStateRegistry;

/// Identity of one host instance.
///
/// Ids are handed out from a monotonic per-thread counter and removed from
/// the coordinator map on disposal, so an id is never observed twice by live
/// coordinators. This replaces hash/address keying on purpose: identity
/// reuse cannot collide with a coordinator that has not been disposed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("host#{_0}")]
pub struct HostId(u64);

thread_local! {
    static NEXT_HOST_ID: Cell<u64> = const { Cell::new(0) };
}

impl HostId {
    /// Allocate a fresh identity for a newly created host.
    #[must_use]
    pub fn fresh() -> Self {
        NEXT_HOST_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            Self(id)
        })
    }
}

/// Capabilities a host must expose for its fields to be saved.
///
/// A host that returns `None` from either accessor cannot participate;
/// delegate operations on it fail with
/// [`StatekeepError::UnsupportedHost`](crate::errors::StatekeepError::UnsupportedHost).
pub trait StateHost {
    fn host_id(&self) -> HostId;

    fn saved_state_registry(&self) -> Option<Rc<SavedStateRegistry>>;

    fn lifecycle(&self) -> Option<Rc<LifecycleSource>>;
}

/// Handle returned by [`LifecycleSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Source of the single terminal "disposed" event in a host's life.
///
/// Observers fire exactly once, in subscription order, when [`dispose`]
/// runs; subscribing after disposal is a no-op. All of this is
/// single-threaded by contract, like the rest of the crate.
///
/// [`dispose`]: LifecycleSource::dispose
#[derive(Default)]
pub struct LifecycleSource {
    next_id: Cell<u64>,
    disposed: Cell<bool>,
    observers: RefCell<Vec<(SubscriptionId, Box<dyn FnOnce()>)>>,
}

impl LifecycleSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    pub fn subscribe(&self, observer: impl FnOnce() + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        if self.disposed.get() {
            log::warn!("subscription after disposal is dropped immediately");
            return id;
        }
        self.observers
            .borrow_mut()
            .push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.observers
            .borrow_mut()
            .retain(|(observer_id, _)| *observer_id != id);
    }

    /// Fire the terminal event. Observers are drained before any of them
    /// runs, so an observer unsubscribing mid-dispatch is harmless; a second
    /// `dispose` call is a no-op.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let observers = self.observers.take();
        for (_, observer) in observers {
            observer();
        }
    }
}

impl std::fmt::Debug for LifecycleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleSource")
            .field("disposed", &self.disposed.get())
            .field("observers", &self.observers.borrow().len())
            .finish()
    }
}
