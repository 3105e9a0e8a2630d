//! Runtime support for the static save/restore path.
//!
//! Hosts that cannot route field access through cells derive
//! [`SavedFields`](crate::SavedFields) instead. The derive validates every
//! tracked field's declared type against the capability decision table at
//! build time and emits a [`FieldPersister`] impl; this module wires that
//! impl into the same per-host coordinator the cells use.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::coordinator::{HostCoordinator, SaveSource};
use crate::errors::StatekeepResult;
use crate::host::StateHost;
use crate::record::Record;

/// Generated save/restore procedures for one host type.
///
/// Implementations chain into embedded ancestor hosts (fields marked
/// `#[saved(base)]`): own fields are processed first, then each ancestor,
/// transitively, in the same order for save and restore. Going through the
/// ancestor's own impl is also what grants access to its private fields —
/// the accessor capability is the impl itself, fixed at build time.
pub trait FieldPersister {
    fn save_fields(&self, record: &mut Record) -> StatekeepResult<()>;

    fn restore_fields(&mut self, record: &mut Record) -> StatekeepResult<()>;
}

/// Save source that reads a statically-persisted host at capture time.
/// Holds the host weakly: the coordinator must not keep a disposed host
/// alive.
struct StaticFieldsSource<H> {
    host: Weak<RefCell<H>>,
}

impl<H: FieldPersister + 'static> SaveSource for StaticFieldsSource<H> {
    fn save_into(&self, record: &mut Record) -> StatekeepResult<()> {
        if let Some(host) = self.host.upgrade() {
            host.borrow().save_fields(record)?;
        }
        Ok(())
    }
}

/// Register a statically-persisted host: coordinator wiring plus a one-time
/// restore of its fields.
///
/// `seed` supplies initial values for keys the restore payload does not
/// carry (launch arguments, typically). It is applied before the payload so
/// a restored value always wins over a seeded one.
pub fn register_host<H>(host: &Rc<RefCell<H>>, seed: Option<&Record>) -> StatekeepResult<()>
where
    H: FieldPersister + StateHost + 'static,
{
    let coordinator = {
        let host_ref = host.borrow();
        let coordinator = HostCoordinator::register(&*host_ref)?;
        coordinator.prime_restore(&*host_ref)?;
        coordinator
    };
    coordinator.add_source(Rc::new(StaticFieldsSource {
        host: Rc::downgrade(host),
    }));

    let mut host_mut = host.borrow_mut();
    if let Some(seed) = seed {
        let mut seed = seed.clone();
        host_mut.restore_fields(&mut seed)?;
    }
    coordinator.with_restore_payload(|payload| match payload {
        Some(record) => host_mut.restore_fields(record),
        None => Ok(()),
    })
}
