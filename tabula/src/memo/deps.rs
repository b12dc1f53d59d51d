//! Dependency identity comparison

use std::rc::Rc;

/// A value usable as one slot of a memo dependency tuple.
///
/// Comparison is by identity, not structure: shared values ([`Rc`]) compare
/// by pointer, plain values (numbers, flags, strings) compare by value.
/// Two structurally equal but separately allocated lists are *different*
/// dependencies.
pub trait Dependency: Clone {
    /// Returns `true` if `other` is the same dependency value as `self`.
    fn same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Dependency for Rc<T> {
    fn same(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: Dependency> Dependency for Option<T> {
    fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same(b),
            (None, None) => true,
            _ => false,
        }
    }
}

macro_rules! value_dependency {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Dependency for $ty {
                fn same(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

value_dependency!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    usize,
    i8,
    i16,
    i32,
    i64,
    isize,
    String,
    &'static str,
);

macro_rules! tuple_dependency {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Dependency),+> Dependency for ($($name,)+) {
            fn same(&self, other: &Self) -> bool {
                $(self.$idx.same(&other.$idx))&&+
            }
        }
    };
}

tuple_dependency!(A: 0);
tuple_dependency!(A: 0, B: 1);
tuple_dependency!(A: 0, B: 1, C: 2);
tuple_dependency!(A: 0, B: 1, C: 2, D: 3);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rc_compares_by_pointer() {
        let a = Rc::new(vec![1, 2, 3]);
        let b = Rc::new(vec![1, 2, 3]);
        assert!(a.same(&Rc::clone(&a)));
        assert!(!a.same(&b), "equal contents, different allocation");
    }

    #[test]
    fn test_strings_compare_by_value() {
        assert!(String::from("a_b").same(&"a_b".to_string()));
        assert!(!String::from("a_b").same(&"a".to_string()));
    }

    #[test]
    fn test_tuple_compares_every_slot() {
        let list: Rc<[u32]> = Rc::from(vec![1, 2]);
        let a = (Rc::clone(&list), 1usize, "x".to_string());
        let b = (Rc::clone(&list), 1usize, "x".to_string());
        let c = (Rc::clone(&list), 2usize, "x".to_string());
        assert!(a.same(&b));
        assert!(!a.same(&c));
    }

    #[test]
    fn test_option_slots() {
        let rc = Rc::new(1);
        assert!(Some(Rc::clone(&rc)).same(&Some(Rc::clone(&rc))));
        assert!(None::<Rc<i32>>.same(&None));
        assert!(!Some(rc).same(&None));
    }
}
