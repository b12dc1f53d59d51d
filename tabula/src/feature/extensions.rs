//! Typed extension slots

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Per-entity storage for feature contributions, one slot per type.
///
/// Inserting a value of a type that is already present replaces it, so the
/// last feature to contribute a given type wins.
#[derive(Clone, Default)]
pub struct Extensions {
    slots: HashMap<TypeId, Rc<dyn Any>>,
}

impl Extensions {
    /// Creates an empty set of slots.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the value it replaced.
    pub fn insert<T: 'static>(&mut self, value: T) -> Option<Rc<T>> {
        self.slots
            .insert(TypeId::of::<T>(), Rc::new(value))
            .and_then(|previous| previous.downcast::<T>().ok())
    }

    /// Returns the stored value of type `T`.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }

    /// Returns a shared handle onto the stored value of type `T`.
    pub fn get_shared<T: 'static>(&self) -> Option<Rc<T>> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|value| Rc::clone(value).downcast::<T>().ok())
    }

    /// Returns `true` if a value of type `T` is stored.
    pub fn contains<T: 'static>(&self) -> bool {
        self.slots.contains_key(&TypeId::of::<T>())
    }

    /// Removes the value of type `T`.
    pub fn remove<T: 'static>(&mut self) -> Option<Rc<T>> {
        self.slots
            .remove(&TypeId::of::<T>())
            .and_then(|value| value.downcast::<T>().ok())
    }

    /// Copies every slot of `other` over `self`.
    pub fn merge(&mut self, other: &Extensions) {
        for (id, value) in &other.slots {
            self.slots.insert(*id, Rc::clone(value));
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extensions")
            .field("len", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Width(u16);

    #[test]
    fn test_insert_replaces_same_type() {
        let mut ext = Extensions::new();
        assert!(ext.insert(Width(10)).is_none());

        let previous = ext.insert(Width(20)).unwrap();
        assert_eq!(*previous, Width(10));
        assert_eq!(ext.get::<Width>(), Some(&Width(20)));
        assert_eq!(ext.len(), 1);
    }

    #[test]
    fn test_distinct_types_do_not_collide() {
        let mut ext = Extensions::new();
        ext.insert(Width(1));
        ext.insert("label");
        assert_eq!(ext.get::<&str>(), Some(&"label"));
        assert_eq!(ext.get::<Width>(), Some(&Width(1)));
        assert!(ext.get::<u32>().is_none());
    }
}
