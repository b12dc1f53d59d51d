//! State store

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::{OnChangeFn, StateKey, TableState, Updater};

/// The single mutable source of truth for table state.
///
/// Cloning the store yields another handle onto the same state.
#[derive(Clone, Default)]
pub struct StateStore {
    state: Rc<RefCell<TableState>>,
    on_change: Rc<RefCell<Option<OnChangeFn<TableState>>>>,
}

impl StateStore {
    /// Creates a store holding `initial`.
    pub fn new(initial: TableState) -> Self {
        Self {
            state: Rc::new(RefCell::new(initial)),
            on_change: Rc::default(),
        }
    }

    /// Current state snapshot.
    pub fn get(&self) -> TableState {
        self.state.borrow().clone()
    }

    /// Current value of one slice.
    pub fn slice<T: 'static>(&self, key: StateKey<T>) -> Option<Rc<T>> {
        self.state.borrow().get(key)
    }

    /// Routes future [`set_state`](Self::set_state) calls through `on_change`
    /// instead of applying them directly.
    pub fn set_on_change(&self, on_change: Option<OnChangeFn<TableState>>) {
        self.on_change.replace(on_change);
    }

    /// Requests a state change.
    ///
    /// Goes through the installed change callback if there is one, otherwise
    /// applies the update directly.
    pub fn set_state(&self, updater: Updater<TableState>) {
        let on_change = self.on_change.borrow().clone();
        match on_change {
            Some(on_change) => on_change(updater),
            None => self.apply(updater),
        }
    }

    /// Applies an update to the stored state, bypassing any change callback.
    pub fn apply(&self, updater: Updater<TableState>) {
        let next = {
            let current = self.state.borrow();
            updater.apply(&current)
        };
        log::trace!("state updated: {:?}", next);
        self.state.replace(next);
    }

    /// Replaces the stored state wholesale.
    pub fn replace(&self, state: TableState) {
        self.apply(Updater::Value(state));
    }

    /// Non-owning handle onto this store.
    pub fn downgrade(&self) -> WeakStateStore {
        WeakStateStore {
            state: Rc::downgrade(&self.state),
            on_change: Rc::downgrade(&self.on_change),
        }
    }
}

/// Non-owning handle onto a [`StateStore`], for change callbacks that the
/// store itself holds.
#[derive(Clone)]
pub struct WeakStateStore {
    state: Weak<RefCell<TableState>>,
    on_change: Weak<RefCell<Option<OnChangeFn<TableState>>>>,
}

impl WeakStateStore {
    /// The store, unless every owning handle has been dropped.
    pub fn upgrade(&self) -> Option<StateStore> {
        Some(StateStore {
            state: self.state.upgrade()?,
            on_change: self.on_change.upgrade()?,
        })
    }
}

impl fmt::Debug for WeakStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakStateStore")
            .field("alive", &(self.state.strong_count() > 0))
            .finish()
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("state", &*self.state.borrow())
            .field("controlled", &self.on_change.borrow().is_some())
            .finish()
    }
}

/// Builds the default change callback for one slice: the slice updater is
/// resolved against the current slice and the result stored through
/// [`StateStore::set_state`].
///
/// A missing slice resolves against `T::default()`.
pub fn make_state_updater<T>(key: StateKey<T>, store: &StateStore) -> OnChangeFn<T>
where
    T: Default + 'static,
{
    let store = store.clone();
    Rc::new(move |updater: Updater<T>| {
        store.set_state(Updater::func(move |old: &TableState| {
            let next = match old.get(key) {
                Some(current) => updater.apply(&current),
                None => updater.apply(&T::default()),
            };
            old.with(key, next)
        }));
    })
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::collections::HashMap;

    use super::*;

    const FLAGS: StateKey<HashMap<String, bool>> = StateKey::new("flags");

    #[test]
    fn test_state_updater_produces_new_slice() {
        let store = StateStore::new(TableState::new().with(FLAGS, HashMap::new()));
        let before = store.slice(FLAGS).unwrap();

        let update = make_state_updater(FLAGS, &store);
        update(Updater::func(|old: &HashMap<String, bool>| {
            let mut next = old.clone();
            next.insert("a".into(), false);
            next
        }));

        let after = store.slice(FLAGS).unwrap();
        assert!(before.is_empty(), "previous slice is never mutated");
        assert_eq!(after.get("a"), Some(&false));
    }

    #[test]
    fn test_missing_slice_resolves_against_default() {
        let store = StateStore::default();
        let update = make_state_updater(FLAGS, &store);
        update(Updater::func(|old: &HashMap<String, bool>| {
            assert!(old.is_empty());
            HashMap::from([("x".to_string(), true)])
        }));
        assert_eq!(store.slice(FLAGS).unwrap().get("x"), Some(&true));
    }

    #[test]
    fn test_controlled_store_defers_to_callback() {
        let store = StateStore::new(TableState::new());
        let calls = Rc::new(Cell::new(0));
        let seen = Rc::clone(&calls);
        store.set_on_change(Some(Rc::new(move |_updater: Updater<TableState>| {
            seen.set(seen.get() + 1);
        })));

        store.set_state(Updater::Value(TableState::new().with(FLAGS, HashMap::new())));
        assert_eq!(calls.get(), 1);
        assert!(store.slice(FLAGS).is_none(), "controlled store is not written");

        store.apply(Updater::Value(TableState::new().with(FLAGS, HashMap::new())));
        assert!(store.slice(FLAGS).is_some());
    }

    #[test]
    fn test_weak_handle_does_not_keep_store_alive() {
        let store = StateStore::new(TableState::new());
        let weak = store.downgrade();
        store.set_on_change(Some(Rc::new({
            let weak = weak.clone();
            move |updater: Updater<TableState>| {
                if let Some(store) = weak.upgrade() {
                    store.apply(updater);
                }
            }
        })));

        store.set_state(Updater::Value(TableState::new().with(FLAGS, HashMap::new())));
        assert!(store.slice(FLAGS).is_some());

        drop(store);
        assert!(weak.upgrade().is_none());
    }
}
