//! Column regions
//!
//! Splits the leaf columns into left, center and right regions. Pinning
//! features own this split; visibility only consumes it. Without such a
//! feature every leaf column sits in the center.

use std::rc::Rc;

use super::Table;
use crate::column::Column;

/// Published contract for the left/center/right leaf column split.
///
/// Implementations must return the same `Rc` for as long as the split is
/// unchanged: downstream memos compare these lists by identity.
pub trait ColumnRegions {
    /// Leaf columns pinned to the left.
    fn left_leaf_columns(&self, table: &Table) -> Rc<[Column]>;
    /// Unpinned leaf columns.
    fn center_leaf_columns(&self, table: &Table) -> Rc<[Column]>;
    /// Leaf columns pinned to the right.
    fn right_leaf_columns(&self, table: &Table) -> Rc<[Column]>;
}

/// Default split: no pinned columns.
#[derive(Debug)]
pub struct UnpinnedRegions {
    empty: Rc<[Column]>,
}

impl UnpinnedRegions {
    /// Creates the default split.
    pub fn new() -> Self {
        Self {
            empty: Rc::from(Vec::new()),
        }
    }
}

impl Default for UnpinnedRegions {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnRegions for UnpinnedRegions {
    fn left_leaf_columns(&self, _table: &Table) -> Rc<[Column]> {
        Rc::clone(&self.empty)
    }

    fn center_leaf_columns(&self, table: &Table) -> Rc<[Column]> {
        table.get_all_leaf_columns()
    }

    fn right_leaf_columns(&self, _table: &Table) -> Rc<[Column]> {
        Rc::clone(&self.empty)
    }
}
