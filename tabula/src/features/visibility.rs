//! Visibility feature: per-column show/hide state.
//!
//! Visibility of a column resolves in this order: the `columnVisibility`
//! state entry, the column's `default_is_visible`, then `true`.
//! Hideability resolves: the table's `enable_hiding` option, the column's
//! `enable_hiding`, its `default_can_hide`, then `true`. The table-wide
//! option deliberately overrides per-column configuration.

use std::collections::HashMap;
use std::rc::Rc;

use crate::cell::Cell;
use crate::column::{Column, ColumnDefaults, ColumnParts};
use crate::error::TableError;
use crate::feature::Feature;
use crate::memo::Memo;
use crate::props::{PropBag, UserProps, prop_getter};
use crate::row::{Row, RowParts};
use crate::state::{StateKey, StateStore, TableState, Updater, make_state_updater};
use crate::table::{Shared, Table, TableOptions, TableParts};

/// Column id to explicit visibility flag.
pub type VisibilityState = HashMap<String, bool>;

/// State slice holding [`VisibilityState`].
pub const COLUMN_VISIBILITY: StateKey<VisibilityState> = StateKey::new("columnVisibility");

/// Lets users show and hide columns.
///
/// Installs the visible-column caches on the table and the visible-cell
/// caches on every row. Without this feature every column is visible, none
/// can hide, and the visibility getters and mutators fail with
/// [`TableError::InvariantViolation`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Visibility;

impl Feature for Visibility {
    fn name(&self) -> &'static str {
        "visibility"
    }

    fn initial_state(&self, state: &mut TableState) {
        state.set(COLUMN_VISIBILITY, VisibilityState::new());
    }

    fn default_options(&self, defaults: &mut TableOptions, store: &StateStore) {
        defaults.on_column_visibility_change = Some(make_state_updater(COLUMN_VISIBILITY, store));
    }

    fn default_column(&self, defaults: &mut ColumnDefaults) {
        defaults.default_is_visible = Some(true);
    }

    fn extend_table(&self, table: &mut TableParts<'_>) -> Result<(), TableError> {
        table.extensions.insert(VisibleColumns {
            flat: Memo::new("table.getVisibleFlatColumns"),
            leaf: Memo::new("table.getVisibleLeafColumns"),
            left: Memo::new("table.getLeftVisibleLeafColumns"),
            center: Memo::new("table.getCenterVisibleLeafColumns"),
            right: Memo::new("table.getRightVisibleLeafColumns"),
        });
        Ok(())
    }

    fn extend_column(&self, column: &mut ColumnParts, _table: &Table) -> Result<(), TableError> {
        column.extensions.insert(Toggleable);
        Ok(())
    }

    fn extend_row(&self, row: &mut RowParts, _table: &Table) -> Result<(), TableError> {
        row.extensions.insert(VisibleCells {
            all: Memo::new("row.getAllVisibleCells"),
            left: Memo::new("row.getLeftVisibleCells"),
            center: Memo::new("row.getCenterVisibleCells"),
            right: Memo::new("row.getRightVisibleCells"),
            visible: Memo::new("row.getVisibleCells"),
        });
        Ok(())
    }
}

type ColumnMemo = Memo<(Rc<[Column]>, String), Rc<[Column]>>;
type RegionMemo = Memo<(Rc<[Cell]>, Rc<[Column]>), Rc<[Cell]>>;

struct VisibleColumns {
    flat: ColumnMemo,
    leaf: ColumnMemo,
    left: ColumnMemo,
    center: ColumnMemo,
    right: ColumnMemo,
}

/// Marks a column as managed by this feature.
struct Toggleable;

struct VisibleCells {
    all: Memo<(Rc<[Cell]>, String), Rc<[Cell]>>,
    left: RegionMemo,
    center: RegionMemo,
    right: RegionMemo,
    visible: Memo<(Rc<[Cell]>, Rc<[Cell]>, Rc<[Cell]>), Rc<[Cell]>>,
}

impl Shared {
    fn column_visibility(&self) -> Option<Rc<VisibilityState>> {
        self.store.slice(COLUMN_VISIBILITY)
    }

    fn set_column_visibility(&self, updater: Updater<VisibilityState>) {
        match &self.options.on_column_visibility_change {
            Some(on_change) => on_change(updater),
            None => log::warn!("column visibility update ignored: no change handler installed"),
        }
    }
}

/// Joins the ids of the visible columns; used as a memo dependency so that
/// visibility changes invalidate the filtered lists.
fn visible_column_key(columns: &[Column]) -> String {
    columns
        .iter()
        .filter(|column| column.get_is_visible())
        .map(Column::id)
        .collect::<Vec<_>>()
        .join("_")
}

fn visible_cell_key(cells: &[Cell]) -> String {
    cells
        .iter()
        .filter(|cell| cell.column().get_is_visible())
        .map(Cell::id)
        .collect::<Vec<_>>()
        .join("_")
}

fn visible_columns(
    memo: &ColumnMemo,
    debug: bool,
    columns: impl FnOnce() -> Rc<[Column]>,
) -> Rc<[Column]> {
    memo.get(
        debug,
        || {
            let columns = columns();
            let key = visible_column_key(&columns);
            (columns, key)
        },
        |(columns, _)| {
            columns
                .iter()
                .filter(|column| column.get_is_visible())
                .cloned()
                .collect()
        },
    )
}

impl Column {
    /// Whether the column is currently shown.
    pub fn get_is_visible(&self) -> bool {
        self.0
            .shared
            .column_visibility()
            .and_then(|state| state.get(&self.0.id).copied())
            .or(self.0.default_is_visible)
            .unwrap_or(true)
    }

    /// Whether the user may hide the column.
    ///
    /// Always `false` when the table was built without [`Visibility`].
    pub fn get_can_hide(&self) -> bool {
        if self.extension::<Toggleable>().is_none() {
            return false;
        }
        self.0
            .shared
            .options
            .enable_hiding
            .or(self.0.enable_hiding)
            .or(self.0.default_can_hide)
            .unwrap_or(true)
    }

    /// Sets (or with `None`, flips) the column's visibility.
    ///
    /// Does nothing when the column cannot hide.
    pub fn toggle_visibility(&self, value: Option<bool>) -> Result<(), TableError> {
        if self.extension::<Toggleable>().is_none() {
            return Err(self
                .0
                .shared
                .verbosity()
                .invariant(|| format!("feature `{}` not registered", Visibility.name())));
        }
        if !self.get_can_hide() {
            log::debug!("column {} cannot hide; toggle ignored", self.0.id);
            return Ok(());
        }

        let column = self.clone();
        self.0.shared.set_column_visibility(Updater::func(move |old: &VisibilityState| {
            let current = old
                .get(column.id())
                .copied()
                .or(column.0.default_is_visible)
                .unwrap_or(true);
            let mut next = old.clone();
            next.insert(column.id().to_string(), value.unwrap_or(!current));
            next
        }));
        Ok(())
    }

    /// Checkbox props for toggling this column.
    pub fn get_toggle_visibility_props(&self, user_props: Option<UserProps>) -> PropBag {
        let column = self.clone();
        let props = PropBag::new()
            .attr("type", "checkbox")
            .attr("checked", self.get_is_visible())
            .attr("title", "Toggle Column Visibility")
            .on_change(move |checked| {
                if let Err(e) = column.toggle_visibility(Some(checked)) {
                    log::warn!("{e}");
                }
            });
        prop_getter(props, user_props)
    }
}

impl Table {
    fn visible_columns_cache(&self) -> Result<&VisibleColumns, TableError> {
        self.extension::<VisibleColumns>()
            .ok_or_else(|| self.feature_missing(Visibility.name()))
    }

    /// Visible columns of the whole tree, depth first.
    pub fn get_visible_flat_columns(&self) -> Result<Rc<[Column]>, TableError> {
        let cache = self.visible_columns_cache()?;
        Ok(visible_columns(&cache.flat, self.options().debug_columns(), || {
            self.get_all_flat_columns()
        }))
    }

    /// Visible leaf columns, left to right.
    pub fn get_visible_leaf_columns(&self) -> Result<Rc<[Column]>, TableError> {
        let cache = self.visible_columns_cache()?;
        Ok(visible_columns(&cache.leaf, self.options().debug_columns(), || {
            self.get_all_leaf_columns()
        }))
    }

    /// Visible leaf columns of the left region.
    pub fn get_left_visible_leaf_columns(&self) -> Result<Rc<[Column]>, TableError> {
        let cache = self.visible_columns_cache()?;
        Ok(visible_columns(&cache.left, self.options().debug_columns(), || {
            self.get_left_leaf_columns()
        }))
    }

    /// Visible leaf columns of the center region.
    pub fn get_center_visible_leaf_columns(&self) -> Result<Rc<[Column]>, TableError> {
        let cache = self.visible_columns_cache()?;
        Ok(visible_columns(&cache.center, self.options().debug_columns(), || {
            self.get_center_leaf_columns()
        }))
    }

    /// Visible leaf columns of the right region.
    pub fn get_right_visible_leaf_columns(&self) -> Result<Rc<[Column]>, TableError> {
        let cache = self.visible_columns_cache()?;
        Ok(visible_columns(&cache.right, self.options().debug_columns(), || {
            self.get_right_leaf_columns()
        }))
    }

    /// Sends a visibility update to `on_column_visibility_change`.
    pub fn set_column_visibility(
        &self,
        updater: impl Into<Updater<VisibilityState>>,
    ) -> Result<(), TableError> {
        self.visible_columns_cache()?;
        self.shared().set_column_visibility(updater.into());
        Ok(())
    }

    /// Sets (or with `None`, flips) one column's visibility.
    ///
    /// An empty id is ignored; an unknown id fails with
    /// [`TableError::InvariantViolation`].
    pub fn toggle_column_visibility(&self, column_id: &str, value: Option<bool>) -> Result<(), TableError> {
        self.visible_columns_cache()?;
        if column_id.is_empty() {
            return Ok(());
        }
        self.get_column(column_id)?.toggle_visibility(value)
    }

    /// Shows or hides every leaf column; with `None`, hides all when all are
    /// visible and shows all otherwise.
    ///
    /// Columns that cannot hide stay visible when hiding.
    pub fn toggle_all_columns_visible(&self, value: Option<bool>) -> Result<(), TableError> {
        let value = value.unwrap_or_else(|| !self.get_is_all_columns_visible());
        let next: VisibilityState = self
            .get_all_leaf_columns()
            .iter()
            .map(|column| {
                let visible = if value { value } else { !column.get_can_hide() };
                (column.id().to_string(), visible)
            })
            .collect();
        self.set_column_visibility(Updater::Value(next))
    }

    /// Visibility of the column `column_id`.
    pub fn get_column_is_visible(&self, column_id: &str) -> Result<bool, TableError> {
        Ok(self.get_column(column_id)?.get_is_visible())
    }

    /// Hideability of the column `column_id`.
    pub fn get_column_can_hide(&self, column_id: &str) -> Result<bool, TableError> {
        Ok(self.get_column(column_id)?.get_can_hide())
    }

    /// Returns `true` if no leaf column is hidden.
    pub fn get_is_all_columns_visible(&self) -> bool {
        self.get_all_leaf_columns().iter().all(Column::get_is_visible)
    }

    /// Returns `true` if at least one leaf column is visible.
    pub fn get_is_some_columns_visible(&self) -> bool {
        self.get_all_leaf_columns().iter().any(Column::get_is_visible)
    }

    /// Checkbox props for toggling every column at once.
    ///
    /// `indeterminate` is present only when some but not all columns are
    /// visible.
    pub fn get_toggle_all_columns_visibility_props(&self, user_props: Option<UserProps>) -> PropBag {
        let all = self.get_is_all_columns_visible();
        let some = self.get_is_some_columns_visible();
        let table = self.clone();

        let mut props = PropBag::new()
            .attr("type", "checkbox")
            .attr("title", "Toggle visibility for all columns")
            .attr("checked", all)
            .on_change(move |checked| {
                if let Err(e) = table.toggle_all_columns_visible(Some(checked)) {
                    log::warn!("{e}");
                }
            });
        if !all && some {
            props = props.attr("indeterminate", "indeterminate");
        }
        prop_getter(props, user_props)
    }
}

impl Row {
    fn visible_cells_cache(&self, table: &Table) -> Result<&VisibleCells, TableError> {
        self.extension::<VisibleCells>()
            .ok_or_else(|| table.feature_missing(Visibility.name()))
    }

    /// Cells whose column is visible, in leaf column order.
    pub fn get_all_visible_cells(&self) -> Result<Rc<[Cell]>, TableError> {
        let table = self.table()?;
        self.visible_cells_cache(&table)?.all.try_get(
            table.options().debug_rows(),
            || {
                let cells = self.get_all_cells()?;
                let key = visible_cell_key(&cells);
                Ok((cells, key))
            },
            |(cells, _)| {
                Ok(cells
                    .iter()
                    .filter(|cell| cell.column().get_is_visible())
                    .cloned()
                    .collect())
            },
        )
    }

    /// Visible cells of the left region.
    pub fn get_left_visible_cells(&self) -> Result<Rc<[Cell]>, TableError> {
        let table = self.table()?;
        let cache = self.visible_cells_cache(&table)?;
        self.region_cells(&cache.left, &table, || table.get_left_visible_leaf_columns())
    }

    /// Visible cells of the center region.
    pub fn get_center_visible_cells(&self) -> Result<Rc<[Cell]>, TableError> {
        let table = self.table()?;
        let cache = self.visible_cells_cache(&table)?;
        self.region_cells(&cache.center, &table, || table.get_center_visible_leaf_columns())
    }

    /// Visible cells of the right region.
    pub fn get_right_visible_cells(&self) -> Result<Rc<[Cell]>, TableError> {
        let table = self.table()?;
        let cache = self.visible_cells_cache(&table)?;
        self.region_cells(&cache.right, &table, || table.get_right_visible_leaf_columns())
    }

    /// Visible cells: left region, then center, then right.
    pub fn get_visible_cells(&self) -> Result<Rc<[Cell]>, TableError> {
        let table = self.table()?;
        self.visible_cells_cache(&table)?.visible.try_get(
            table.options().debug_rows(),
            || {
                Ok((
                    self.get_left_visible_cells()?,
                    self.get_center_visible_cells()?,
                    self.get_right_visible_cells()?,
                ))
            },
            |(left, center, right)| {
                Ok(left
                    .iter()
                    .chain(center.iter())
                    .chain(right.iter())
                    .cloned()
                    .collect())
            },
        )
    }

    fn region_cells(
        &self,
        memo: &RegionMemo,
        table: &Table,
        columns: impl FnOnce() -> Result<Rc<[Column]>, TableError>,
    ) -> Result<Rc<[Cell]>, TableError> {
        memo.try_get(
            table.options().debug_rows(),
            || Ok((self.get_all_cells()?, columns()?)),
            |(_, columns)| {
                let by_column = self.get_all_cells_by_column_id()?;
                columns
                    .iter()
                    .map(|column| {
                        by_column
                            .get(column.id())
                            .cloned()
                            .ok_or_else(|| table.cell_lookup_failed(self.id(), column.id()))
                    })
                    .collect()
            },
        )
    }
}
