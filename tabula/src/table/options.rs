//! Table options

use std::fmt;
use std::rc::Rc;

use crate::column::{ColumnDef, ColumnDefaults};
use crate::error::ErrorVerbosity;
use crate::features::VisibilityState;
use crate::row::RowData;
use crate::state::{OnChangeFn, TableState};

/// Configuration of one table.
///
/// Every optional field left unset by the host is filled from the
/// registered features' defaults.
///
/// # Example
///
/// ```
/// use tabula::column::ColumnDef;
/// use tabula::row::RowData;
/// use tabula::table::TableOptions;
///
/// let options = TableOptions::new()
///     .with_columns(vec![ColumnDef::new("age")])
///     .with_data(vec![RowData::new("r1").with_value("age", 30)])
///     .with_enable_hiding(true);
/// assert_eq!(options.enable_hiding, Some(true));
/// ```
#[derive(Clone, Default)]
pub struct TableOptions {
    /// Row data snapshot.
    pub data: Rc<[RowData]>,

    /// Column definitions (roots of the column tree).
    pub columns: Vec<ColumnDef>,

    /// State slices merged over the features' initial state.
    pub initial_state: Option<TableState>,

    /// Column property defaults merged over the features' defaults.
    pub default_column: ColumnDefaults,

    /// Global hiding switch. When set it overrides every column's own
    /// hiding configuration.
    pub enable_hiding: Option<bool>,

    /// Receives column visibility updates.
    ///
    /// Default: applies the update to the table's state store.
    pub on_column_visibility_change: Option<OnChangeFn<VisibilityState>>,

    /// Receives whole-state updates. When unset updates are applied to the
    /// table's state store directly.
    ///
    /// The table owns this handler, so it must not capture a [`Table`] or a
    /// [`StateStore`] clone: either forms an `Rc` cycle and the table is
    /// never freed. Capture [`StateStore::downgrade`] instead.
    ///
    /// [`Table`]: crate::table::Table
    /// [`StateStore`]: crate::state::StateStore
    /// [`StateStore::downgrade`]: crate::state::StateStore::downgrade
    pub on_state_change: Option<OnChangeFn<TableState>>,

    /// Enables every debug flag below.
    pub debug_all: Option<bool>,

    /// Logs table construction.
    pub debug_table: Option<bool>,

    /// Logs recomputation of column derivations.
    pub debug_columns: Option<bool>,

    /// Logs recomputation of row and cell derivations.
    pub debug_rows: Option<bool>,

    /// Detail level of error messages.
    ///
    /// Default: verbose with debug assertions, terse otherwise.
    pub error_verbosity: ErrorVerbosity,
}

impl TableOptions {
    /// Creates options with no columns and no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row data.
    pub fn with_data(mut self, data: impl Into<Rc<[RowData]>>) -> Self {
        self.data = data.into();
        self
    }

    /// Sets the column definitions.
    pub fn with_columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    /// Sets the initial state overrides.
    pub fn with_initial_state(mut self, state: TableState) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Sets the host's column defaults.
    pub fn with_default_column(mut self, defaults: ColumnDefaults) -> Self {
        self.default_column = defaults;
        self
    }

    /// Sets the global hiding switch.
    pub fn with_enable_hiding(mut self, enable: bool) -> Self {
        self.enable_hiding = Some(enable);
        self
    }

    /// Sets the column visibility change callback.
    pub fn with_on_column_visibility_change(mut self, on_change: OnChangeFn<VisibilityState>) -> Self {
        self.on_column_visibility_change = Some(on_change);
        self
    }

    /// Sets the whole-state change callback.
    pub fn with_on_state_change(mut self, on_change: OnChangeFn<TableState>) -> Self {
        self.on_state_change = Some(on_change);
        self
    }

    /// Enables all debug logging.
    pub fn with_debug_all(mut self, debug: bool) -> Self {
        self.debug_all = Some(debug);
        self
    }

    /// Sets the error message verbosity.
    pub fn with_error_verbosity(mut self, verbosity: ErrorVerbosity) -> Self {
        self.error_verbosity = verbosity;
        self
    }

    /// Fills every unset optional field from `defaults`. Values set on
    /// `self` win; column defaults are layered the same way.
    pub fn merge_defaults(mut self, defaults: TableOptions) -> Self {
        self.initial_state = self.initial_state.or(defaults.initial_state);
        self.enable_hiding = self.enable_hiding.or(defaults.enable_hiding);
        self.on_column_visibility_change = self
            .on_column_visibility_change
            .or(defaults.on_column_visibility_change);
        self.on_state_change = self.on_state_change.or(defaults.on_state_change);
        self.debug_all = self.debug_all.or(defaults.debug_all);
        self.debug_table = self.debug_table.or(defaults.debug_table);
        self.debug_columns = self.debug_columns.or(defaults.debug_columns);
        self.debug_rows = self.debug_rows.or(defaults.debug_rows);

        let mut column = defaults.default_column;
        column.merge(&self.default_column);
        self.default_column = column;
        self
    }

    /// Whether table construction is logged.
    pub fn debug_table(&self) -> bool {
        self.debug_all.or(self.debug_table).unwrap_or(false)
    }

    /// Whether column derivations are logged.
    pub fn debug_columns(&self) -> bool {
        self.debug_all.or(self.debug_columns).unwrap_or(false)
    }

    /// Whether row and cell derivations are logged.
    pub fn debug_rows(&self) -> bool {
        self.debug_all.or(self.debug_rows).unwrap_or(false)
    }
}

impl fmt::Debug for TableOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableOptions")
            .field("rows", &self.data.len())
            .field("columns", &self.columns)
            .field("default_column", &self.default_column)
            .field("enable_hiding", &self.enable_hiding)
            .field(
                "on_column_visibility_change",
                &self.on_column_visibility_change.is_some(),
            )
            .field("on_state_change", &self.on_state_change.is_some())
            .field("debug_all", &self.debug_all)
            .field("error_verbosity", &self.error_verbosity)
            .finish_non_exhaustive()
    }
}
