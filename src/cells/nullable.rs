use std::cell::RefCell;
use std::rc::Rc;

use super::{CellInner, bind, consume_restored, new_inner};
use crate::errors::StatekeepResult;
use crate::host::StateHost;
use crate::value::SavedValue;

/// Cell for a field where "no value" is a legal terminal state.
///
/// `get` lazily runs the initializer (if any) exactly once, then consults the
/// restore payload; `set(None)` clears the value, and a cleared value is
/// simply absent from the saved record.
pub struct NullableCell<T> {
    inner: Rc<RefCell<CellInner<T>>>,
    init: Option<Box<dyn Fn() -> T>>,
}

impl<T: SavedValue + Clone + 'static> NullableCell<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: new_inner(),
            init: None,
        }
    }

    pub fn with_init(init: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: new_inner(),
            init: Some(Box::new(init)),
        }
    }

    /// Current value of the field, initializing and restoring on first use.
    pub fn get(&self, host: &dyn StateHost, key: &str) -> StatekeepResult<Option<T>> {
        {
            let mut cell = self.inner.borrow_mut();
            if !cell.initialized {
                cell.value = self.init.as_ref().map(|init| init());
                cell.initialized = true;
            }
        }
        bind(&self.inner, host, key)?;
        consume_restored(&self.inner, host, key)?;
        Ok(self.inner.borrow().value.clone())
    }

    /// Store a value (or clear it with `None`); counts as initialization.
    pub fn set(&self, host: &dyn StateHost, key: &str, value: Option<T>) -> StatekeepResult<()> {
        {
            let mut cell = self.inner.borrow_mut();
            cell.value = value;
            cell.initialized = true;
        }
        bind(&self.inner, host, key)
    }
}

impl<T: SavedValue + Clone + 'static> Default for NullableCell<T> {
    fn default() -> Self {
        Self::new()
    }
}
