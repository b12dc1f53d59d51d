//! Updater contract

use std::fmt;
use std::rc::Rc;

/// A requested state change: either a replacement value or a pure function
/// of the previous value.
pub enum Updater<T> {
    /// Replace the old value.
    Value(T),
    /// Derive the new value from the old one.
    Func(Box<dyn FnOnce(&T) -> T>),
}

impl<T> Updater<T> {
    /// Functional-update form.
    pub fn func(f: impl FnOnce(&T) -> T + 'static) -> Self {
        Self::Func(Box::new(f))
    }

    /// Resolves the update against `old`.
    pub fn apply(self, old: &T) -> T {
        match self {
            Self::Value(value) => value,
            Self::Func(f) => f(old),
        }
    }
}

impl<T> From<T> for Updater<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for Updater<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Func(_) => f.write_str("Func(..)"),
        }
    }
}

/// Callback receiving state updates.
///
/// The default callbacks installed by features apply the updater to the
/// table's [`StateStore`](super::StateStore); a host may install its own to
/// keep the state outside the table.
pub type OnChangeFn<T> = Rc<dyn Fn(Updater<T>)>;
