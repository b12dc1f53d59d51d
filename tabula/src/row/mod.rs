//! Rows
//!
//! One [`Row`] is built per [`RowData`] of the table's data snapshot. The
//! row model is memoized on the identity of the snapshot: replacing the data
//! rebuilds every row (and with them every cell) on the next read.

use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ErrorVerbosity, TableError};
use crate::feature::Extensions;
use crate::table::{Table, TableInner};

/// One record of the dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RowData {
    /// Stable row id.
    pub id: String,
    /// Raw values keyed by column id.
    #[serde(default)]
    pub values: HashMap<String, Value>,
}

impl RowData {
    /// Creates a record without values.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: HashMap::new(),
        }
    }

    /// Sets the value of one column.
    pub fn with_value(mut self, column_id: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(column_id.into(), value.into());
        self
    }
}

/// Row properties while features extend a row under construction.
pub struct RowParts {
    id: String,
    index: usize,
    values: HashMap<String, Value>,
    /// Feature contributions.
    pub extensions: Extensions,
}

impl RowParts {
    /// Row id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position in the data snapshot.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Raw values keyed by column id.
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }
}

impl fmt::Debug for RowParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowParts")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

pub(crate) struct RowInner {
    pub(crate) id: String,
    index: usize,
    pub(crate) values: HashMap<String, Value>,
    extensions: Extensions,
    verbosity: ErrorVerbosity,
    table: Weak<TableInner>,
}

/// A composed row.
///
/// Cheap to clone: clones share the same row.
#[derive(Clone)]
pub struct Row(pub(crate) Rc<RowInner>);

impl Row {
    /// Row id.
    pub fn id(&self) -> &str {
        &self.0.id
    }

    /// Position in the data snapshot.
    pub fn index(&self) -> usize {
        self.0.index
    }

    /// Raw values keyed by column id.
    pub fn values(&self) -> &HashMap<String, Value> {
        &self.0.values
    }

    /// Raw value of one column.
    pub fn get_value(&self, column_id: &str) -> Option<&Value> {
        self.0.values.get(column_id)
    }

    /// Feature contribution of type `T`.
    pub fn extension<T: 'static>(&self) -> Option<&T> {
        self.0.extensions.get::<T>()
    }

    /// The owning table.
    ///
    /// Fails once the table has been dropped.
    pub fn table(&self) -> Result<Table, TableError> {
        self.0
            .table
            .upgrade()
            .map(Table)
            .ok_or_else(|| {
                self.0
                    .verbosity
                    .invariant(|| format!("row {} outlived its table", self.0.id))
            })
    }

    /// Returns `true` if both handles refer to the same row.
    pub fn ptr_eq(&self, other: &Row) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn downgrade(&self) -> Weak<RowInner> {
        Rc::downgrade(&self.0)
    }
}

impl fmt::Debug for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Row")
            .field("id", &self.0.id)
            .field("index", &self.0.index)
            .field("values", &self.0.values)
            .finish_non_exhaustive()
    }
}

/// Rows of one data snapshot.
#[derive(Clone, Default)]
pub struct RowModel {
    rows: Rc<[Row]>,
    rows_by_id: Rc<HashMap<String, Row>>,
}

impl RowModel {
    /// Rows in data order.
    pub fn rows(&self) -> &Rc<[Row]> {
        &self.rows
    }

    /// Rows keyed by id.
    pub fn rows_by_id(&self) -> &HashMap<String, Row> {
        &self.rows_by_id
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the model has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Debug for RowModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rows.iter()).finish()
    }
}

impl Table {
    /// Rows built from the current data snapshot.
    ///
    /// Memoized on the snapshot's identity. Fails when two records share an
    /// id or a feature's `extend_row` fails.
    pub fn get_core_row_model(&self) -> Result<RowModel, TableError> {
        self.0.row_model.try_get(
            self.options().debug_rows(),
            || Ok((self.data(),)),
            |(data,)| {
                let mut rows = Vec::with_capacity(data.len());
                let mut rows_by_id = HashMap::with_capacity(data.len());
                for (index, record) in data.iter().enumerate() {
                    let row = self.create_row(record, index)?;
                    if rows_by_id.insert(record.id.clone(), row.clone()).is_some() {
                        return Err(self
                            .verbosity()
                            .invariant(|| format!("duplicate row id {}", record.id)));
                    }
                    rows.push(row);
                }
                Ok(RowModel {
                    rows: rows.into(),
                    rows_by_id: Rc::new(rows_by_id),
                })
            },
        )
    }

    /// Rows in data order.
    pub fn get_rows(&self) -> Result<Rc<[Row]>, TableError> {
        Ok(Rc::clone(self.get_core_row_model()?.rows()))
    }

    /// Looks up a row by id. Fails with [`TableError::NotFound`].
    pub fn get_row(&self, id: &str) -> Result<Row, TableError> {
        self.get_core_row_model()?
            .rows_by_id()
            .get(id)
            .cloned()
            .ok_or_else(|| self.row_lookup_failed(id))
    }

    /// Builds one row and applies every feature's `extend_row`.
    pub fn create_row(&self, record: &RowData, index: usize) -> Result<Row, TableError> {
        let mut parts = RowParts {
            id: record.id.clone(),
            index,
            values: record.values.clone(),
            extensions: Extensions::new(),
        };
        for feature in self.features().iter() {
            log::trace!("extend_row {}: {}", record.id, feature.name());
            feature.extend_row(&mut parts, self)?;
        }

        Ok(Row(Rc::new(RowInner {
            id: parts.id,
            index: parts.index,
            values: parts.values,
            extensions: parts.extensions,
            verbosity: self.verbosity(),
            table: Rc::downgrade(&self.0),
        })))
    }
}
