//! Table instance
//!
//! [`Table`] is the root aggregate: it owns the feature registry, the state
//! store, the resolved options and the column tree, and serves the memoized
//! derivations that rows and features build upon.
//!
//! Construction runs the composition passes in this order:
//!
//! 1. feature initial state, then the host's initial state over it;
//! 2. feature option defaults under the host's options;
//! 3. feature column defaults, then the host's column defaults over them;
//! 4. `extend_table` for every feature;
//! 5. the column tree, with `extend_column` per column.
//!
//! Rows are built lazily from the data snapshot on first read.

mod options;
mod regions;

pub use options::*;
pub use regions::*;

use std::cell::{OnceCell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::column::{Column, build_columns};
use crate::error::{ErrorVerbosity, TableError};
use crate::feature::{Extensions, FeatureRegistry};
use crate::memo::Memo;
use crate::row::{RowData, RowModel};
use crate::state::{StateStore, TableState, Updater};

/// Table-level parts while features extend the table.
pub struct TableParts<'a> {
    options: &'a TableOptions,
    store: &'a StateStore,
    /// Left/center/right leaf column split. Replace to provide pinning.
    pub regions: Rc<dyn ColumnRegions>,
    /// Table-level feature contributions.
    pub extensions: Extensions,
}

impl TableParts<'_> {
    /// Resolved options.
    pub fn options(&self) -> &TableOptions {
        self.options
    }

    /// The table's state store.
    pub fn store(&self) -> &StateStore {
        self.store
    }
}

impl fmt::Debug for TableParts<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableParts")
            .field("options", self.options)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

/// Parts of the table every entity may hold strongly.
pub(crate) struct Shared {
    pub(crate) options: TableOptions,
    pub(crate) store: StateStore,
    pub(crate) features: FeatureRegistry,
    initial_state: TableState,
}

impl Shared {
    pub(crate) fn verbosity(&self) -> ErrorVerbosity {
        self.options.error_verbosity
    }
}

type ColumnList = Rc<[Column]>;

pub(crate) struct TableInner {
    shared: Rc<Shared>,
    regions: Rc<dyn ColumnRegions>,
    extensions: Extensions,
    data: RefCell<Rc<[RowData]>>,
    columns: OnceCell<Vec<Column>>,

    flat_columns: Memo<(), ColumnList>,
    leaf_columns: Memo<(), ColumnList>,
    columns_by_id: Memo<(), Rc<HashMap<String, Column>>>,
    pub(crate) row_model: Memo<(Rc<[RowData]>,), RowModel>,
}

/// A composed table.
///
/// Cheap to clone: clones share the same table.
///
/// # Example
///
/// ```
/// use tabula::column::ColumnDef;
/// use tabula::row::RowData;
/// use tabula::table::{Table, TableOptions};
///
/// let table = Table::new(
///     TableOptions::new()
///         .with_columns(vec![ColumnDef::new("age")])
///         .with_data(vec![RowData::new("r1").with_value("age", 30)]),
/// )?;
///
/// let cell = table.get_cell("r1", "age")?;
/// assert_eq!(cell.id(), "r1_age");
/// assert_eq!(cell.value(), &serde_json::json!(30));
/// # Ok::<(), tabula::error::TableError>(())
/// ```
#[derive(Clone)]
pub struct Table(pub(crate) Rc<TableInner>);

impl Table {
    /// Builds a table with the default features.
    pub fn new(options: TableOptions) -> Result<Self, TableError> {
        Self::with_features(options, FeatureRegistry::with_defaults())
    }

    /// Builds a table composed from `features`, in registration order.
    pub fn with_features(options: TableOptions, features: FeatureRegistry) -> Result<Self, TableError> {
        let mut initial = TableState::new();
        for feature in features.iter() {
            feature.initial_state(&mut initial);
        }
        if let Some(host) = &options.initial_state {
            initial.merge(host);
        }
        let store = StateStore::new(initial.clone());

        let mut defaults = TableOptions::default();
        for feature in features.iter() {
            feature.default_options(&mut defaults, &store);
        }
        for feature in features.iter() {
            feature.default_column(&mut defaults.default_column);
        }
        let options = options.merge_defaults(defaults);
        store.set_on_change(options.on_state_change.clone());

        let mut parts = TableParts {
            options: &options,
            store: &store,
            regions: Rc::new(UnpinnedRegions::new()),
            extensions: Extensions::new(),
        };
        for feature in features.iter() {
            log::trace!("extend_table: {}", feature.name());
            feature.extend_table(&mut parts)?;
        }
        let TableParts {
            regions, extensions, ..
        } = parts;

        let data = Rc::clone(&options.data);
        let shared = Rc::new(Shared {
            options,
            store,
            features,
            initial_state: initial,
        });

        let table = Table(Rc::new(TableInner {
            shared,
            regions,
            extensions,
            data: RefCell::new(data),
            columns: OnceCell::new(),
            flat_columns: Memo::new("table.getAllFlatColumns"),
            leaf_columns: Memo::new("table.getAllLeafColumns"),
            columns_by_id: Memo::new("table.getAllFlatColumnsById"),
            row_model: Memo::new("table.getCoreRowModel"),
        }));

        let columns = build_columns(&table)?;
        let column_count = columns.len();
        if table.0.columns.set(columns).is_err() {
            return Err(TableError::invariant("column tree built twice"));
        }

        if table.options().debug_table() {
            log::debug!(
                "table constructed: {} root columns, {} rows, features {:?}",
                column_count,
                table.0.data.borrow().len(),
                table.0.shared.features.names(),
            );
        }

        Ok(table)
    }

    pub(crate) fn shared(&self) -> &Rc<Shared> {
        &self.0.shared
    }

    pub(crate) fn verbosity(&self) -> ErrorVerbosity {
        self.0.shared.verbosity()
    }

    /// Resolved options.
    pub fn options(&self) -> &TableOptions {
        &self.0.shared.options
    }

    /// Registered features.
    pub fn features(&self) -> &FeatureRegistry {
        &self.0.shared.features
    }

    /// The state store.
    pub fn store(&self) -> &StateStore {
        &self.0.shared.store
    }

    /// Current state snapshot.
    pub fn get_state(&self) -> TableState {
        self.0.shared.store.get()
    }

    /// Requests a whole-state change (through `on_state_change` if set).
    pub fn set_state(&self, updater: impl Into<Updater<TableState>>) {
        self.0.shared.store.set_state(updater.into());
    }

    /// State the table was constructed with.
    pub fn initial_state(&self) -> &TableState {
        &self.0.shared.initial_state
    }

    /// Requests a return to the initial state.
    pub fn reset_state(&self) {
        self.set_state(Updater::Value(self.0.shared.initial_state.clone()));
    }

    /// Table-level feature contribution of type `T`.
    pub fn extension<T: 'static>(&self) -> Option<&T> {
        self.0.extensions.get::<T>()
    }

    /// Current data snapshot.
    pub fn data(&self) -> Rc<[RowData]> {
        Rc::clone(&self.0.data.borrow())
    }

    /// Replaces the data snapshot. Rows are rebuilt on the next read.
    pub fn set_data(&self, data: impl Into<Rc<[RowData]>>) {
        self.0.data.replace(data.into());
    }

    /// Root columns.
    ///
    /// # Panics
    ///
    /// When called from a feature's `extend_column` hook: the column tree
    /// does not exist until composition has finished.
    pub fn get_all_columns(&self) -> &[Column] {
        match self.0.columns.get() {
            Some(columns) => columns,
            None => panic!("table columns read before construction completed"),
        }
    }

    /// Every column of the tree, depth first.
    pub fn get_all_flat_columns(&self) -> Rc<[Column]> {
        self.0.flat_columns.get(
            self.options().debug_columns(),
            || (),
            |_| {
                self.get_all_columns()
                    .iter()
                    .flat_map(Column::get_flat_columns)
                    .collect()
            },
        )
    }

    /// Every leaf column, left to right.
    pub fn get_all_leaf_columns(&self) -> Rc<[Column]> {
        self.0.leaf_columns.get(
            self.options().debug_columns(),
            || (),
            |_| {
                self.get_all_columns()
                    .iter()
                    .flat_map(Column::get_leaf_columns)
                    .collect()
            },
        )
    }

    /// Looks up a column anywhere in the tree.
    ///
    /// Fails with [`TableError::InvariantViolation`] when `id` was never
    /// registered.
    pub fn get_column(&self, id: &str) -> Result<Column, TableError> {
        let by_id = self.0.columns_by_id.get(
            self.options().debug_columns(),
            || (),
            |_| {
                Rc::new(
                    self.get_all_flat_columns()
                        .iter()
                        .map(|column| (column.id().to_string(), column.clone()))
                        .collect(),
                )
            },
        );
        by_id
            .get(id)
            .cloned()
            .ok_or_else(|| self.verbosity().invariant(|| format!("could not find column with id {id}")))
    }

    /// Leaf columns of the left region.
    pub fn get_left_leaf_columns(&self) -> Rc<[Column]> {
        self.0.regions.left_leaf_columns(self)
    }

    /// Leaf columns of the center region.
    pub fn get_center_leaf_columns(&self) -> Rc<[Column]> {
        self.0.regions.center_leaf_columns(self)
    }

    /// Leaf columns of the right region.
    pub fn get_right_leaf_columns(&self) -> Rc<[Column]> {
        self.0.regions.right_leaf_columns(self)
    }

    /// Returns `true` if both handles refer to the same table.
    pub fn ptr_eq(&self, other: &Table) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn cell_lookup_failed(&self, row_id: &str, column_id: &str) -> TableError {
        self.verbosity()
            .not_found(|| format!("could not find cell {column_id} in row {row_id}"))
    }

    pub(crate) fn row_lookup_failed(&self, row_id: &str) -> TableError {
        self.verbosity()
            .not_found(|| format!("could not find row with id {row_id}"))
    }

    pub(crate) fn feature_missing(&self, feature: &str) -> TableError {
        self.verbosity()
            .invariant(|| format!("feature `{feature}` not registered"))
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("features", &self.0.shared.features)
            .field("columns", &self.0.columns.get())
            .field("rows", &self.0.data.borrow().len())
            .field("state", &self.0.shared.store)
            .finish_non_exhaustive()
    }
}
