//! Columns
//!
//! Columns form a tree built once per table from [`ColumnDef`]s. Leaf
//! columns (no children) map one-to-one onto the cells of every row.

mod def;

pub use def::*;

use std::cell::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::TableError;
use crate::feature::Extensions;
use crate::table::{Shared, Table};

/// Column properties while features extend a column under construction.
///
/// Starts from the column definition layered over the resolved column
/// defaults. Features may overwrite any public field.
pub struct ColumnParts {
    id: String,
    depth: usize,
    parent_id: Option<String>,
    /// Header text.
    pub header: Option<String>,
    /// Cell renderer.
    pub cell: Option<CellRenderer>,
    /// Per-column hiding switch.
    pub enable_hiding: Option<bool>,
    /// Whether the column can be hidden when nothing else decides.
    pub default_can_hide: Option<bool>,
    /// Visibility when the state has no entry for the column.
    pub default_is_visible: Option<bool>,
    /// Feature contributions, seeded from [`ColumnDef::meta`].
    pub extensions: Extensions,
}

impl ColumnParts {
    /// Column id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Nesting depth, `0` for root columns.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Id of the parent column.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }
}

impl fmt::Debug for ColumnParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnParts")
            .field("id", &self.id)
            .field("depth", &self.depth)
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

pub(crate) struct ColumnInner {
    pub(crate) id: String,
    depth: usize,
    header: Option<String>,
    pub(crate) cell: Option<CellRenderer>,
    pub(crate) enable_hiding: Option<bool>,
    pub(crate) default_can_hide: Option<bool>,
    pub(crate) default_is_visible: Option<bool>,
    extensions: Extensions,
    parent: OnceCell<Weak<ColumnInner>>,
    children: Vec<Column>,
    pub(crate) shared: Rc<Shared>,
}

/// A composed column.
///
/// Cheap to clone: clones share the same column.
#[derive(Clone)]
pub struct Column(pub(crate) Rc<ColumnInner>);

impl Column {
    /// Column id, unique within the table.
    pub fn id(&self) -> &str {
        &self.0.id
    }

    /// Header text.
    pub fn header(&self) -> Option<&str> {
        self.0.header.as_deref()
    }

    /// Nesting depth, `0` for root columns.
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    /// Parent column, `None` for root columns.
    pub fn parent(&self) -> Option<Column> {
        self.0.parent.get().and_then(Weak::upgrade).map(Column)
    }

    /// Direct child columns.
    pub fn columns(&self) -> &[Column] {
        &self.0.children
    }

    /// Returns `true` if the column has no children.
    pub fn is_leaf(&self) -> bool {
        self.0.children.is_empty()
    }

    /// This column followed by all of its descendants, depth first.
    pub fn get_flat_columns(&self) -> Vec<Column> {
        let mut flat = vec![self.clone()];
        for child in &self.0.children {
            flat.extend(child.get_flat_columns());
        }
        flat
    }

    /// Leaf descendants in order, or the column itself if it is a leaf.
    pub fn get_leaf_columns(&self) -> Vec<Column> {
        if self.is_leaf() {
            return vec![self.clone()];
        }
        self.0
            .children
            .iter()
            .flat_map(Column::get_leaf_columns)
            .collect()
    }

    /// Cell renderer, if any.
    pub fn cell_renderer(&self) -> Option<&CellRenderer> {
        self.0.cell.as_ref()
    }

    /// Resolved per-column hiding switch.
    pub fn enable_hiding(&self) -> Option<bool> {
        self.0.enable_hiding
    }

    /// Resolved default hideability.
    pub fn default_can_hide(&self) -> Option<bool> {
        self.0.default_can_hide
    }

    /// Resolved default visibility.
    pub fn default_is_visible(&self) -> Option<bool> {
        self.0.default_is_visible
    }

    /// Feature contribution of type `T`.
    pub fn extension<T: 'static>(&self) -> Option<&T> {
        self.0.extensions.get::<T>()
    }

    /// Returns `true` if both handles refer to the same column.
    pub fn ptr_eq(&self, other: &Column) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("id", &self.0.id)
            .field("depth", &self.0.depth)
            .field("children", &self.0.children)
            .finish_non_exhaustive()
    }
}

/// Builds the column tree of `table` from its options.
///
/// Every feature extends a column before its children are built.
pub(crate) fn build_columns(table: &Table) -> Result<Vec<Column>, TableError> {
    let mut seen = HashSet::new();
    table
        .shared()
        .options
        .columns
        .iter()
        .map(|def| build_column(table, def, 0, None, &mut seen))
        .collect()
}

fn build_column(
    table: &Table,
    def: &ColumnDef,
    depth: usize,
    parent_id: Option<&str>,
    seen: &mut HashSet<String>,
) -> Result<Column, TableError> {
    let shared = table.shared();
    let verbosity = shared.options.error_verbosity;

    if def.id.is_empty() {
        return Err(verbosity.invariant(|| match parent_id {
            Some(parent) => format!("column under {parent} has no id"),
            None => "column at depth 0 has no id".to_string(),
        }));
    }
    if !seen.insert(def.id.clone()) {
        return Err(verbosity.invariant(|| format!("duplicate column id {}", def.id)));
    }

    let defaults = &shared.options.default_column;
    let mut parts = ColumnParts {
        id: def.id.clone(),
        depth,
        parent_id: parent_id.map(str::to_string),
        header: def.header.clone(),
        cell: def.cell.clone().or_else(|| defaults.cell.clone()),
        enable_hiding: def.enable_hiding.or(defaults.enable_hiding),
        default_can_hide: def.default_can_hide.or(defaults.default_can_hide),
        default_is_visible: def.default_is_visible.or(defaults.default_is_visible),
        extensions: def.meta.clone(),
    };

    for feature in shared.features.iter() {
        log::trace!("extend_column {}: {}", def.id, feature.name());
        feature.extend_column(&mut parts, table)?;
    }

    let children = def
        .columns
        .iter()
        .map(|child| build_column(table, child, depth + 1, Some(&def.id), seen))
        .collect::<Result<Vec<_>, _>>()?;

    let column = Column(Rc::new(ColumnInner {
        id: parts.id,
        depth,
        header: parts.header,
        cell: parts.cell,
        enable_hiding: parts.enable_hiding,
        default_can_hide: parts.default_can_hide,
        default_is_visible: parts.default_is_visible,
        extensions: parts.extensions,
        parent: OnceCell::new(),
        children,
        shared: Rc::clone(shared),
    }));

    for child in &column.0.children {
        let _ = child.0.parent.set(Rc::downgrade(&column.0));
    }

    Ok(column)
}
