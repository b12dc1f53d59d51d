//! Feature composition
//!
//! A [`Feature`] is a stateless bundle of contributions to the table and
//! its entities. Every hook has a no-op default, so a feature implements
//! only what it contributes:
//!
//! | Hook | Runs | Contributes |
//! |------|------|-------------|
//! | [`initial_state`](Feature::initial_state) | once per table | state slices |
//! | [`default_options`](Feature::default_options) | once per table | option defaults (host options win) |
//! | [`default_column`](Feature::default_column) | once per table | column property defaults |
//! | [`extend_table`](Feature::extend_table) | once per table | capability slots, table extensions |
//! | [`extend_column`](Feature::extend_column) | per column | column properties, extensions |
//! | [`extend_row`](Feature::extend_row) | per row | row extensions |
//! | [`extend_cell`](Feature::extend_cell) | per cell | cell extensions |
//!
//! Hooks run in registration order. Each extension hook receives the parts
//! already carrying the contributions of earlier features, and a later
//! feature writing the same slot replaces the earlier value. Registration
//! order is therefore the integrator's tool for resolving overlaps: register
//! a feature after the ones it builds upon or overrides.
//!
//! An extension hook returning an error aborts construction of the whole
//! table (or of the row/cell being built); nothing is partially registered.

mod extensions;

pub use extensions::*;

use std::fmt;
use std::rc::Rc;

use crate::cell::CellParts;
use crate::column::{Column, ColumnDefaults, ColumnParts};
use crate::error::TableError;
use crate::features::{Cells, Visibility};
use crate::row::{Row, RowParts};
use crate::state::{StateStore, TableState};
use crate::table::{Table, TableOptions, TableParts};

/// A composable unit of table behavior.
pub trait Feature {
    /// Name used in diagnostics and error reports.
    fn name(&self) -> &'static str;

    /// Adds this feature's slices to the initial table state.
    fn initial_state(&self, _state: &mut TableState) {}

    /// Fills option defaults. Options set by the host take precedence.
    fn default_options(&self, _defaults: &mut TableOptions, _store: &StateStore) {}

    /// Fills column property defaults. Column definitions take precedence.
    fn default_column(&self, _defaults: &mut ColumnDefaults) {}

    /// Extends the table before any column or row exists.
    fn extend_table(&self, _table: &mut TableParts<'_>) -> Result<(), TableError> {
        Ok(())
    }

    /// Extends a column under construction.
    fn extend_column(&self, _column: &mut ColumnParts, _table: &Table) -> Result<(), TableError> {
        Ok(())
    }

    /// Extends a row under construction.
    fn extend_row(&self, _row: &mut RowParts, _table: &Table) -> Result<(), TableError> {
        Ok(())
    }

    /// Extends a cell under construction.
    fn extend_cell(
        &self,
        _cell: &mut CellParts,
        _column: &Column,
        _row: &Row,
        _table: &Table,
    ) -> Result<(), TableError> {
        Ok(())
    }
}

/// Ordered list of features applied to a table.
#[derive(Clone, Default)]
pub struct FeatureRegistry {
    features: Vec<Rc<dyn Feature>>,
}

impl FeatureRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in features: [`Cells`] then [`Visibility`].
    pub fn with_defaults() -> Self {
        Self::new().with(Cells).with(Visibility)
    }

    /// Appends `feature` and returns the registry.
    pub fn with(mut self, feature: impl Feature + 'static) -> Self {
        self.register(feature);
        self
    }

    /// Appends `feature`. It runs after every feature registered before it.
    pub fn register(&mut self, feature: impl Feature + 'static) {
        self.features.push(Rc::new(feature));
    }

    /// Appends an already shared feature.
    pub fn register_shared(&mut self, feature: Rc<dyn Feature>) {
        self.features.push(feature);
    }

    /// Features in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Feature> {
        self.features.iter().map(|feature| feature.as_ref())
    }

    /// Feature names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Feature::name).collect()
    }

    /// Returns `true` if a feature called `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|feature| feature.name() == name)
    }

    /// Number of registered features.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns `true` if no feature is registered.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
