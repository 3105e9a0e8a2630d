use std::cell::RefCell;
use std::rc::Rc;

use super::{CellInner, bind, consume_restored, new_inner};
use crate::errors::{StatekeepError, StatekeepResult};
use crate::host::StateHost;
use crate::value::SavedValue;

/// Cell whose reads always produce a value: absence is resolved by running
/// the initializer before first use, and a restored entry overrides it.
pub struct ValueCell<T> {
    inner: Rc<RefCell<CellInner<T>>>,
    init: Box<dyn Fn() -> T>,
}

impl<T: SavedValue + Clone + 'static> ValueCell<T> {
    pub fn new(init: impl Fn() -> T + 'static) -> Self {
        Self {
            inner: new_inner(),
            init: Box::new(init),
        }
    }

    pub fn get(&self, host: &dyn StateHost, key: &str) -> StatekeepResult<T> {
        {
            let mut cell = self.inner.borrow_mut();
            if !cell.initialized {
                cell.value = Some((self.init)());
                cell.initialized = true;
            }
        }
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
}
