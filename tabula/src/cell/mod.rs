//! Cells
//!
//! A [`Cell`] is the intersection of one row and one leaf column. Its value
//! is copied from the row when the cell is created and never re-read.

use std::fmt;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::column::Column;
use crate::error::{ErrorVerbosity, TableError};
use crate::feature::Extensions;
use crate::props::{PropBag, UserProps};
use crate::row::{Row, RowInner};
use crate::table::{Table, TableInner};

/// Builds the id of the cell at `row_id` / `column_id`.
pub fn cell_id(row_id: &str, column_id: &str) -> String {
    format!("{row_id}_{column_id}")
}

/// Cell properties while features extend a cell under construction.
pub struct CellParts {
    id: String,
    row_id: String,
    column_id: String,
    value: Value,
    /// Feature contributions.
    pub extensions: Extensions,
}

impl CellParts {
    /// Cell id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id of the owning row.
    pub fn row_id(&self) -> &str {
        &self.row_id
    }

    /// Id of the column.
    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    /// Value snapshot.
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Debug for CellParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellParts")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

pub(crate) struct CellInner {
    id: String,
    row_id: String,
    column_id: String,
    row: Weak<RowInner>,
    column: Column,
    value: Value,
    extensions: Extensions,
    verbosity: ErrorVerbosity,
    table: Weak<TableInner>,
}

/// A composed cell.
///
/// Cheap to clone: clones share the same cell.
#[derive(Clone)]
pub struct Cell(pub(crate) Rc<CellInner>);

/// Everything a cell renderer gets to see.
#[derive(Debug)]
pub struct CellContext<'a> {
    /// The cell being rendered.
    pub cell: &'a Cell,
    /// Its column.
    pub column: &'a Column,
    /// Its row, unless the row has been dropped.
    pub row: Option<Row>,
    /// The value snapshot.
    pub value: &'a Value,
}

impl Cell {
    /// Cell id: `{row_id}_{column_id}`.
    pub fn id(&self) -> &str {
        &self.0.id
    }

    /// Id of the owning row.
    pub fn row_id(&self) -> &str {
        &self.0.row_id
    }

    /// Id of the column.
    pub fn column_id(&self) -> &str {
        &self.0.column_id
    }

    /// Value snapshot taken when the cell was created.
    pub fn value(&self) -> &Value {
        &self.0.value
    }

    /// The cell's column.
    pub fn column(&self) -> &Column {
        &self.0.column
    }

    /// The owning row, unless it has been dropped.
    pub fn row(&self) -> Option<Row> {
        self.0.row.upgrade().map(Row)
    }

    /// Feature contribution of type `T`.
    pub fn extension<T: 'static>(&self) -> Option<&T> {
        self.0.extensions.get::<T>()
    }

    /// Renders the cell through its column's renderer.
    ///
    /// Returns `None` when the column has no renderer.
    pub fn render_cell(&self) -> Option<String> {
        let render = self.0.column.cell_renderer()?;
        let context = CellContext {
            cell: self,
            column: &self.0.column,
            row: self.row(),
            value: &self.0.value,
        };
        Some(render(&context))
    }

    /// Prop bag for this cell. See [`Table::get_cell_props`].
    pub fn get_cell_props(&self, user_props: Option<UserProps>) -> Result<PropBag, TableError> {
        let table = self
            .0
            .table
            .upgrade()
            .map(Table)
            .ok_or_else(|| {
                self.0
                    .verbosity
                    .invariant(|| format!("cell {} outlived its table", self.0.id))
            })?;
        table.get_cell_props(&self.0.row_id, &self.0.column_id, user_props)
    }

    /// Returns `true` if both handles refer to the same cell.
    pub fn ptr_eq(&self, other: &Cell) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("id", &self.0.id)
            .field("value", &self.0.value)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Builds the cell of `row` at `column` holding `value`, then applies
    /// every feature's `extend_cell`.
    pub fn create_cell(&self, row: &Row, column: &Column, value: Value) -> Result<Cell, TableError> {
        let mut parts = CellParts {
            id: cell_id(row.id(), column.id()),
            row_id: row.id().to_string(),
            column_id: column.id().to_string(),
            value,
            extensions: Extensions::new(),
        };
        for feature in self.features().iter() {
            feature.extend_cell(&mut parts, column, row, self)?;
        }

        Ok(Cell(Rc::new(CellInner {
            id: parts.id,
            row_id: parts.row_id,
            column_id: parts.column_id,
            row: row.downgrade(),
            column: column.clone(),
            value: parts.value,
            extensions: parts.extensions,
            verbosity: self.verbosity(),
            table: Rc::downgrade(&self.0),
        })))
    }
}
