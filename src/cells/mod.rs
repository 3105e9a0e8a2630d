//! Property state cells: per-field wrappers mediating get/set and
//! persistence for one host field.
//!
//! Three variants differ only in how absence is handled:
//!
//! - [`NullableCell`] — absent is a legal terminal value;
//! - [`ValueCell`] — absence is resolved through an initializer before first
//!   use, so reads always produce a value;
//! - [`LateCell`] — no initializer; a read before any write or restore is an
//!   error, probed non-fatally with
//!   [`is_initialized`](LateCell::is_initialized).
//!
//! A cell binds itself to its property key and its host's coordinator on
//! first get/set; a cell that was never touched contributes nothing to the
//! saved record. The free functions at the bottom are the conventional
//! constructors.

use std::cell::RefCell;
use std::rc::Rc;

use crate::coordinator::{HostCoordinator, SaveSource};
use crate::errors::{StatekeepError, StatekeepResult};
use crate::host::StateHost;
use crate::record::Record;
use crate::value::SavedValue;
use crate::codec;

mod late;
mod nullable;
mod value;

pub use late::LateCell;
pub use nullable::NullableCell;
pub use value::ValueCell;

/// State shared by all cell variants.
pub(crate) struct CellInner<T> {
    pub(crate) value: Option<T>,
    pub(crate) key: Option<String>,
    pub(crate) initialized: bool,
    pub(crate) registered: bool,
}

impl<T> CellInner<T> {
    fn unbound() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            value: None,
            key: None,
            initialized: false,
            registered: false,
        }))
    }
}

pub(crate) fn new_inner<T>() -> Rc<RefCell<CellInner<T>>> {
    CellInner::unbound()
}

impl<T: SavedValue> SaveSource for RefCell<CellInner<T>> {
    fn save_into(&self, record: &mut Record) -> StatekeepResult<()> {
        let inner = self.borrow();
        // Unbound means never read or written; absent means nothing to
        // encode. Either way the key stays out of the record.
        let (Some(key), Some(value)) = (inner.key.as_ref(), inner.value.as_ref()) else {
            return Ok(());
        };
        codec::encode(record, key, value.to_state()).map_err(StatekeepError::from)
    }
}

/// Register the cell with its host's coordinator under `key`.
///
/// Idempotent for a repeated key; a different key rebinds. Fails with
/// `UnsupportedHost` when the host lacks the registry or lifecycle
/// capability.
pub(crate) fn bind<T: SavedValue + 'static>(
    inner: &Rc<RefCell<CellInner<T>>>,
    host: &dyn StateHost,
    key: &str,
) -> StatekeepResult<()> {
    if host.saved_state_registry().is_none() || host.lifecycle().is_none() {
        return Err(StatekeepError::UnsupportedHost);
    }
    let coordinator = HostCoordinator::register(host)?;
    let needs_registration = {
        let mut cell = inner.borrow_mut();
        match cell.key.as_deref() {
            Some(bound) if bound == key => {}
            Some(bound) => {
                log::warn!("cell rebound from `{bound}` to `{key}`");
                cell.key = Some(key.to_owned());
            }
            None => cell.key = Some(key.to_owned()),
        }
        let first = !cell.registered;
        cell.registered = true;
        first
    };
    if needs_registration {
        coordinator.add_source(Rc::clone(inner) as Rc<dyn SaveSource>);
    }
    Ok(())
}

/// Pull this cell's key out of the host's cached restore payload, overwriting
/// the in-memory value when the key is present. The key is consumed: a second
/// lookup finds nothing and leaves the value alone.
pub(crate) fn consume_restored<T: SavedValue + 'static>(
    inner: &Rc<RefCell<CellInner<T>>>,
    host: &dyn StateHost,
    key: &str,
) -> StatekeepResult<()> {
    if host.saved_state_registry().is_none() || host.lifecycle().is_none() {
        return Err(StatekeepError::UnsupportedHost);
    }
    // No coordinator yet means nothing was registered for this host, so
    // there is no payload to read from.
    let Some(coordinator) = HostCoordinator::lookup(host.host_id()) else {
        return Ok(());
    };
    if let Some(value) = coordinator.consume_restored(host, key)? {
        let restored = T::from_state(value)?;
        let mut cell = inner.borrow_mut();
        cell.value = Some(restored);
        cell.initialized = true;
    }
    Ok(())
}

/// Cell whose value may legitimately be absent, with an optional initializer.
#[must_use]
pub fn nullable<T: SavedValue + Clone + 'static>() -> NullableCell<T> {
    NullableCell::new()
}

/// Nullable cell with an initializer run on first read.
pub fn nullable_with<T: SavedValue + Clone + 'static>(
    init: impl Fn() -> T + 'static,
) -> NullableCell<T> {
    NullableCell::with_init(init)
}

/// Cell that always produces a value, seeded by `init` on first read.
pub fn value<T: SavedValue + Clone + 'static>(init: impl Fn() -> T + 'static) -> ValueCell<T> {
    ValueCell::new(init)
}

/// Cell that must be written (or restored) before it is read.
#[must_use]
pub fn late_init<T: SavedValue + Clone + 'static>() -> LateCell<T> {
    LateCell::new()
}
