//! Column definitions and defaults

use std::fmt;
use std::rc::Rc;

use crate::cell::CellContext;
use crate::feature::Extensions;

/// Renders one cell to text.
pub type CellRenderer = Rc<dyn Fn(&CellContext<'_>) -> String>;

/// Host-supplied description of one column (and its children).
///
/// # Examples
///
/// ```
/// use tabula::column::ColumnDef;
///
/// let columns = vec![
///     ColumnDef::new("name").header("Name"),
///     ColumnDef::new("contact").header("Contact").columns(vec![
///         ColumnDef::new("email"),
///         ColumnDef::new("phone").default_is_visible(false),
///     ]),
/// ];
/// assert_eq!(columns[1].columns.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct ColumnDef {
    /// Unique column id; also the key of the column's value in each row.
    pub id: String,
    /// Header text.
    pub header: Option<String>,
    /// Child columns (grouped headers).
    pub columns: Vec<ColumnDef>,
    /// Cell renderer.
    pub cell: Option<CellRenderer>,
    /// Per-column hiding switch.
    pub enable_hiding: Option<bool>,
    /// Whether the column can be hidden when nothing else decides.
    pub default_can_hide: Option<bool>,
    /// Visibility when the state has no entry for the column.
    pub default_is_visible: Option<bool>,
    /// Values for features, copied into the column's extensions.
    pub meta: Extensions,
}

impl ColumnDef {
    /// Creates a leaf column definition.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Sets the header text.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Sets the child columns.
    pub fn columns(mut self, columns: Vec<ColumnDef>) -> Self {
        self.columns = columns;
        self
    }

    /// Appends one child column.
    pub fn child(mut self, column: ColumnDef) -> Self {
        self.columns.push(column);
        self
    }

    /// Sets the cell renderer.
    pub fn cell(mut self, render: impl Fn(&CellContext<'_>) -> String + 'static) -> Self {
        self.cell = Some(Rc::new(render));
        self
    }

    /// Sets the per-column hiding switch.
    pub fn enable_hiding(mut self, enable: bool) -> Self {
        self.enable_hiding = Some(enable);
        self
    }

    /// Sets the default hideability.
    pub fn default_can_hide(mut self, can_hide: bool) -> Self {
        self.default_can_hide = Some(can_hide);
        self
    }

    /// Sets the default visibility.
    pub fn default_is_visible(mut self, visible: bool) -> Self {
        self.default_is_visible = Some(visible);
        self
    }

    /// Attaches a value for features to read.
    pub fn meta<T: 'static>(mut self, value: T) -> Self {
        self.meta.insert(value);
        self
    }
}

impl fmt::Debug for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("columns", &self.columns)
            .field("cell", &self.cell.is_some())
            .field("enable_hiding", &self.enable_hiding)
            .field("default_can_hide", &self.default_can_hide)
            .field("default_is_visible", &self.default_is_visible)
            .finish()
    }
}

/// Column property defaults, filled by features and the host.
#[derive(Clone, Default)]
pub struct ColumnDefaults {
    /// Default cell renderer.
    pub cell: Option<CellRenderer>,
    /// Default per-column hiding switch.
    pub enable_hiding: Option<bool>,
    /// Default hideability.
    pub default_can_hide: Option<bool>,
    /// Default visibility.
    pub default_is_visible: Option<bool>,
}

impl ColumnDefaults {
    /// Creates empty defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default cell renderer.
    pub fn with_cell(mut self, render: impl Fn(&CellContext<'_>) -> String + 'static) -> Self {
        self.cell = Some(Rc::new(render));
        self
    }

    /// Sets the default per-column hiding switch.
    pub fn with_enable_hiding(mut self, enable: bool) -> Self {
        self.enable_hiding = Some(enable);
        self
    }

    /// Sets the default hideability.
    pub fn with_default_can_hide(mut self, can_hide: bool) -> Self {
        self.default_can_hide = Some(can_hide);
        self
    }

    /// Sets the default visibility.
    pub fn with_default_is_visible(mut self, visible: bool) -> Self {
        self.default_is_visible = Some(visible);
        self
    }

    /// Layers `other` over `self`: every value set in `other` wins.
    pub fn merge(&mut self, other: &ColumnDefaults) {
        if let Some(cell) = &other.cell {
            self.cell = Some(Rc::clone(cell));
        }
        self.enable_hiding = other.enable_hiding.or(self.enable_hiding);
        self.default_can_hide = other.default_can_hide.or(self.default_can_hide);
        self.default_is_visible = other.default_is_visible.or(self.default_is_visible);
    }
}

impl fmt::Debug for ColumnDefaults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefaults")
            .field("cell", &self.cell.is_some())
            .field("enable_hiding", &self.enable_hiding)
            .field("default_can_hide", &self.default_can_hide)
            .field("default_is_visible", &self.default_is_visible)
            .finish()
    }
}
