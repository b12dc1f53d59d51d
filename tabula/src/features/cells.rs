//! Cells feature: per-row cell materialization and cell lookup.

use std::collections::HashMap;
use std::rc::Rc;

use serde_json::Value;

use crate::cell::Cell;
use crate::column::Column;
use crate::error::TableError;
use crate::feature::Feature;
use crate::memo::Memo;
use crate::props::{PropBag, UserProps, prop_getter};
use crate::row::{Row, RowParts};
use crate::table::Table;

/// Materializes one cell per leaf column on every row.
///
/// Installs the per-row cell caches; without this feature
/// [`Row::get_all_cells`] and [`Table::get_cell`] fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cells;

impl Feature for Cells {
    fn name(&self) -> &'static str {
        "cells"
    }

    fn extend_row(&self, row: &mut RowParts, _table: &Table) -> Result<(), TableError> {
        row.extensions.insert(RowCells {
            all: Memo::new("row.getAllCells"),
            by_column_id: Memo::new("row.getAllCellsByColumnId"),
        });
        Ok(())
    }
}

struct RowCells {
    all: Memo<(Rc<[Column]>,), Rc<[Cell]>>,
    by_column_id: Memo<(Rc<[Cell]>,), Rc<HashMap<String, Cell>>>,
}

impl Row {
    fn cells(&self, table: &Table) -> Result<&RowCells, TableError> {
        self.extension::<RowCells>()
            .ok_or_else(|| table.feature_missing(Cells.name()))
    }

    /// One cell per leaf column, in leaf column order.
    ///
    /// Memoized on the identity of the table's leaf column list; cells are
    /// recreated only when that list changes.
    pub fn get_all_cells(&self) -> Result<Rc<[Cell]>, TableError> {
        let table = self.table()?;
        self.cells(&table)?.all.try_get(
            table.options().debug_rows(),
            || Ok((table.get_all_leaf_columns(),)),
            |(leaf_columns,)| {
                leaf_columns
                    .iter()
                    .map(|column| {
                        let value = self.0.values.get(column.id()).cloned().unwrap_or(Value::Null);
                        table.create_cell(self, column, value)
                    })
                    .collect()
            },
        )
    }

    /// Cells keyed by column id. Memoized on [`get_all_cells`](Self::get_all_cells).
    pub fn get_all_cells_by_column_id(&self) -> Result<Rc<HashMap<String, Cell>>, TableError> {
        let table = self.table()?;
        self.cells(&table)?.by_column_id.try_get(
            table.options().debug_rows(),
            || Ok((self.get_all_cells()?,)),
            |(cells,)| {
                Ok(Rc::new(
                    cells
                        .iter()
                        .map(|cell| (cell.column_id().to_string(), cell.clone()))
                        .collect(),
                ))
            },
        )
    }
}

impl Table {
    /// Looks up the cell at `row_id` / `column_id`.
    ///
    /// Fails with [`TableError::NotFound`] when the row is absent from the
    /// current snapshot or the row has no cell for the column.
    pub fn get_cell(&self, row_id: &str, column_id: &str) -> Result<Cell, TableError> {
        let row = self.get_row(row_id)?;
        row.get_all_cells_by_column_id()?
            .get(column_id)
            .cloned()
            .ok_or_else(|| self.cell_lookup_failed(row_id, column_id))
    }

    /// Prop bag for the cell at `row_id` / `column_id`: `key` and
    /// `role: "gridcell"`, combined with `user_props`.
    pub fn get_cell_props(
        &self,
        row_id: &str,
        column_id: &str,
        user_props: Option<UserProps>,
    ) -> Result<PropBag, TableError> {
        let cell = self.get_cell(row_id, column_id)?;
        Ok(prop_getter(
            PropBag::new().attr("key", cell.id()).attr("role", "gridcell"),
            user_props,
        ))
    }
}
