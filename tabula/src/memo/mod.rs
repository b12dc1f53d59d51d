//! Memoized derivations
//!
//! A [`Memo`] caches the last result of a derivation together with the
//! dependency tuple it was computed from. Each read recomputes the
//! dependencies, compares them slot by slot by identity (see
//! [`Dependency`]) and only re-runs the derivation when a slot changed.
//!
//! Every memoized getter on a table, column or row owns exactly one `Memo`.
//! There is no eviction: the entry lives as long as its owner.

mod deps;

pub use deps::*;

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::fmt;
use std::time::Instant;

#[derive(Debug)]
struct MemoEntry<D, R> {
    deps: D,
    result: R,
}

/// A single-slot memoization cache.
///
/// # Example
///
/// ```
/// use std::rc::Rc;
/// use tabula::memo::Memo;
///
/// let source: Rc<[i32]> = Rc::from(vec![1, 2, 3]);
/// let doubled: Memo<(Rc<[i32]>,), Rc<Vec<i32>>> = Memo::new("doubled");
///
/// let first = doubled.get(false, || (Rc::clone(&source),), |(items,)| {
///     Rc::new(items.iter().map(|v| v * 2).collect())
/// });
/// let second = doubled.get(false, || (Rc::clone(&source),), |_| unreachable!());
///
/// assert!(Rc::ptr_eq(&first, &second));
/// assert_eq!(doubled.generation(), 1);
/// ```
pub struct Memo<D, R> {
    key: &'static str,
    entry: RefCell<Option<MemoEntry<D, R>>>,
    generation: Cell<u64>,
}

impl<D, R> Memo<D, R> {
    /// Creates an empty memo. `key` names it in diagnostics.
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            entry: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// Diagnostic key.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Number of times the derivation has run.
    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Returns `true` if a result is currently cached.
    pub fn is_cached(&self) -> bool {
        self.entry.borrow().is_some()
    }

    /// Drops the cached result; the next read recomputes.
    pub fn reset(&self) {
        self.entry.replace(None);
    }
}

impl<D: Dependency, R: Clone> Memo<D, R> {
    /// Returns the cached result if `deps` is unchanged, otherwise runs
    /// `compute` and caches its result.
    ///
    /// When `debug` is set, recomputations are reported through the `log`
    /// facade. This never affects the returned value.
    pub fn get(&self, debug: bool, deps: impl FnOnce() -> D, compute: impl FnOnce(&D) -> R) -> R {
        match self.try_get::<Infallible>(debug, || Ok(deps()), |d| Ok(compute(d))) {
            Ok(result) => result,
            Err(never) => match never {},
        }
    }

    /// Fallible form of [`get`](Self::get).
    ///
    /// If either closure fails nothing is cached and the error is returned
    /// unmodified; a previously cached result stays in place.
    pub fn try_get<E>(
        &self,
        debug: bool,
        deps: impl FnOnce() -> Result<D, E>,
        compute: impl FnOnce(&D) -> Result<R, E>,
    ) -> Result<R, E> {
        let deps_start = debug.then(Instant::now);
        let deps = deps()?;
        let deps_elapsed = deps_start.map(|start| start.elapsed());

        if let Some(entry) = self.entry.borrow().as_ref()
            && entry.deps.same(&deps)
        {
            return Ok(entry.result.clone());
        }

        let compute_start = debug.then(Instant::now);
        let result = compute(&deps)?;

        self.entry.replace(Some(MemoEntry {
            deps,
            result: result.clone(),
        }));
        self.generation.set(self.generation.get() + 1);

        if let (Some(deps_elapsed), Some(compute_start)) = (deps_elapsed, compute_start) {
            log::debug!(
                "memo {}: recomputed (generation {}) in {:.3}ms, deps {:.3}ms",
                self.key,
                self.generation.get(),
                compute_start.elapsed().as_secs_f64() * 1000.0,
                deps_elapsed.as_secs_f64() * 1000.0,
            );
        }

        Ok(result)
    }
}

impl<D, R> fmt::Debug for Memo<D, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memo")
            .field("key", &self.key)
            .field("generation", &self.generation.get())
            .field("cached", &self.is_cached())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use simplelog::{Config, LevelFilter, TestLogger};

    use super::*;

    fn counting_memo() -> (Memo<(Rc<Vec<i32>>, usize), Rc<i32>>, Rc<Cell<u32>>) {
        (Memo::new("test.sum"), Rc::new(Cell::new(0)))
    }

    #[test]
    fn test_identical_deps_compute_once() {
        let (memo, calls) = counting_memo();
        let list = Rc::new(vec![1, 2, 3]);

        let read = || {
            memo.get(
                false,
                || (Rc::clone(&list), 0),
                |(items, _)| {
                    calls.set(calls.get() + 1);
                    Rc::new(items.iter().sum())
                },
            )
        };

        let first = read();
        let second = read();
        assert!(Rc::ptr_eq(&first, &second), "same result reference");
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.generation(), 1);
    }

    #[test]
    fn test_changed_slot_recomputes_once() {
        let (memo, calls) = counting_memo();
        let list = Rc::new(vec![1, 2, 3]);
        let compute = |(items, offset): &(Rc<Vec<i32>>, usize)| {
            calls.set(calls.get() + 1);
            Rc::new(items.iter().sum::<i32>() + *offset as i32)
        };

        memo.get(false, || (Rc::clone(&list), 0), compute);
        let changed = memo.get(false, || (Rc::clone(&list), 1), compute);
        let again = memo.get(false, || (Rc::clone(&list), 1), compute);

        assert_eq!(*changed, 7);
        assert!(Rc::ptr_eq(&changed, &again));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_structurally_equal_new_allocation_recomputes() {
        let (memo, calls) = counting_memo();
        let compute = |(items, _): &(Rc<Vec<i32>>, usize)| {
            calls.set(calls.get() + 1);
            Rc::new(items.iter().sum())
        };

        memo.get(false, || (Rc::new(vec![1]), 0), compute);
        memo.get(false, || (Rc::new(vec![1]), 0), compute);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_failing_deps_do_not_cache() {
        let memo: Memo<(usize,), Rc<String>> = Memo::new("test.fail");

        let err = memo
            .try_get(false, || Err::<(usize,), _>("boom"), |_| Ok(Rc::new(String::new())))
            .unwrap_err();
        assert_eq!(err, "boom");
        assert!(!memo.is_cached());
        assert_eq!(memo.generation(), 0);
    }

    #[test]
    fn test_failing_compute_keeps_previous_entry() {
        let memo: Memo<(usize,), usize> = Memo::new("test.keep");
        assert_eq!(memo.try_get::<&str>(false, || Ok((1,)), |(v,)| Ok(v * 10)), Ok(10));

        let err = memo.try_get(false, || Ok((2,)), |_| Err("bad"));
        assert_eq!(err, Err("bad"));
        assert_eq!(memo.try_get::<&str>(false, || Ok((1,)), |_| Ok(0)), Ok(10));
        assert_eq!(memo.generation(), 1);
    }

    #[test]
    fn test_debug_does_not_change_result() {
        let _ = TestLogger::init(LevelFilter::Debug, Config::default());
        let memo: Memo<(u32,), u32> = Memo::new("test.debug");

        assert_eq!(memo.get(true, || (2,), |(v,)| v + 1), 3);
        assert_eq!(memo.get(true, || (2,), |_| 0), 3);
        assert_eq!(memo.get(false, || (3,), |(v,)| v + 1), 4);
    }

    #[test]
    fn test_reset_forces_recompute() {
        let memo: Memo<(u32,), u32> = Memo::new("test.reset");
        memo.get(false, || (1,), |(v,)| *v);
        memo.reset();
        assert!(!memo.is_cached());
        memo.get(false, || (1,), |(v,)| *v);
        assert_eq!(memo.generation(), 2);
    }
}
