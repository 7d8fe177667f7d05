//! Interior-mutable storage for entity fields.

use parking_lot::RwLock;

/// One mutable field of a shared entity record.
///
/// Values are validated before they reach `set`, so the cell only ever holds
/// a valid value.
pub(crate) struct Field<T> {
    value: RwLock<T>,
}

impl<T> Field<T> {
    pub(crate) fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    pub(crate) fn set(&self, value: T) {
        *self.value.write() = value;
    }

    pub(crate) fn with<R>(&self, read: impl FnOnce(&T) -> R) -> R {
        read(&self.value.read())
    }
}

impl<T: Clone> Field<T> {
    pub(crate) fn get(&self) -> T {
        self.with(T::clone)
    }
}
