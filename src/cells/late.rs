use std::cell::RefCell;
use std::rc::Rc;

use super::{CellInner, bind, consume_restored, new_inner};
use crate::errors::{StatekeepError, StatekeepResult};
use crate::host::StateHost;
use crate::value::SavedValue;

/// Cell with no initializer: it must be written, or restored from a
/// previous incarnation, before the first read.
pub struct LateCell<T> {
    inner: Rc<RefCell<CellInner<T>>>,
}

impl<T: SavedValue + Clone + 'static> LateCell<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { inner: new_inner() }
    }

    /// Read the value; fails with `UninitializedAccess` when nothing was
    /// ever assigned or restored.
    pub fn get(&self, host: &dyn StateHost, key: &str) -> StatekeepResult<T> {
        bind(&self.inner, host, key)?;
        consume_restored(&self.inner, host, key)?;
        self.inner
            .borrow()
            .value
            .clone()
            .ok_or_else(|| StatekeepError::UninitializedAccess {
                key: key.to_owned(),
            })
    }

    pub fn set(&self, host: &dyn StateHost, key: &str, value: T) -> StatekeepResult<()> {
        {
            let mut cell = self.inner.borrow_mut();
            cell.value = Some(value);
            cell.initialized = true;
        }
        bind(&self.inner, host, key)
    }

    /// Non-fatal probe: performs the same restore-consumption check as `get`
    /// but reports absence as `false` instead of an error. Host capability
    /// problems still surface.
    pub fn is_initialized(&self, host: &dyn StateHost, key: &str) -> StatekeepResult<bool> {
        consume_restored(&self.inner, host, key)?;
        Ok(self.inner.borrow().value.is_some())
    }
}

impl<T: SavedValue + Clone + 'static> Default for LateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
