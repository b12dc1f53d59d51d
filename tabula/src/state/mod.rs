//! Table state
//!
//! Table-wide state is a plain mapping from slice name to value. Each
//! feature owns one or more slices, addressed through typed [`StateKey`]s.
//! State is immutable: an update always produces a new [`TableState`] whose
//! untouched slices are shared with the previous one.

mod store;
mod updater;

pub use store::*;
pub use updater::*;

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

/// Typed name of one state slice.
///
/// ```
/// use tabula::state::{StateKey, TableState};
///
/// const PAGE: StateKey<usize> = StateKey::new("pageIndex");
///
/// let state = TableState::new().with(PAGE, 3);
/// assert_eq!(state.get(PAGE).as_deref(), Some(&3));
/// ```
pub struct StateKey<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StateKey<T> {
    /// Creates a key for the slice called `name`.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Slice name.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for StateKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StateKey<T> {}

impl<T> fmt::Debug for StateKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StateKey({})", self.name)
    }
}

/// Snapshot of all table state slices.
#[derive(Clone, Default)]
pub struct TableState {
    slices: HashMap<&'static str, Rc<dyn Any>>,
}

impl TableState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slice stored under `key`, if any.
    ///
    /// Returns `None` both when the slice is absent and when it holds a
    /// value of a different type.
    pub fn get<T: 'static>(&self, key: StateKey<T>) -> Option<Rc<T>> {
        self.slices
            .get(key.name)
            .and_then(|value| Rc::clone(value).downcast::<T>().ok())
    }

    /// Returns `true` if a slice named like `key` exists.
    pub fn contains<T>(&self, key: StateKey<T>) -> bool {
        self.slices.contains_key(key.name)
    }

    /// Stores `value` under `key`, replacing any previous slice.
    pub fn set<T: 'static>(&mut self, key: StateKey<T>, value: T) {
        self.set_shared(key, Rc::new(value));
    }

    /// Stores an already shared value under `key`.
    pub fn set_shared<T: 'static>(&mut self, key: StateKey<T>, value: Rc<T>) {
        self.slices.insert(key.name, value);
    }

    /// Returns a new state with `key` replaced. `self` is left untouched.
    pub fn with<T: 'static>(&self, key: StateKey<T>, value: T) -> Self {
        let mut next = self.clone();
        next.set(key, value);
        next
    }

    /// Shallow-merges `other` over `self`: every slice of `other` replaces
    /// the slice of the same name.
    pub fn merge(&mut self, other: &TableState) {
        for (name, value) in &other.slices {
            self.slices.insert(*name, Rc::clone(value));
        }
    }

    /// Names of the stored slices, sorted.
    pub fn slice_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.slices.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Returns `true` if `self` and `other` share every slice by identity.
    pub fn same_slices(&self, other: &TableState) -> bool {
        self.slices.len() == other.slices.len()
            && self.slices.iter().all(|(name, value)| {
                other
                    .slices
                    .get(name)
                    .is_some_and(|theirs| Rc::ptr_eq(value, theirs))
            })
    }
}

impl fmt::Debug for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableState")
            .field("slices", &self.slice_names())
            .finish()
    }
}
