//! Headless table engine
//!
//! Tabula models a dataset as columns, rows and cells whose behavior is
//! composed from independent features, and whose derived values (visible
//! columns, cells per row, ...) are memoized on explicit dependencies.
//!
//! - [`table::Table`] is the root aggregate, built from [`table::TableOptions`]
//!   and a [`feature::FeatureRegistry`].
//! - [`memo::Memo`] caches one derivation keyed by dependency identity.
//! - [`state::StateStore`] holds table state; features request changes
//!   through [`state::Updater`]s.
//! - [`features`] holds the built-in features: cell materialization and
//!   column visibility.
//!
//! Everything is single threaded and pull based: a read computes what it
//! needs on the spot and reflects the state as of the call.

pub mod cell;
pub mod column;
pub mod error;
pub mod feature;
pub mod features;
pub mod memo;
pub mod props;
pub mod row;
pub mod state;
pub mod table;

pub mod prelude {
    pub use crate::cell::{Cell, CellContext};
    pub use crate::column::{Column, ColumnDef, ColumnDefaults};
    pub use crate::error::{ErrorVerbosity, TableError};
    pub use crate::feature::{Feature, FeatureRegistry};
    pub use crate::features::{COLUMN_VISIBILITY, Cells, Visibility, VisibilityState};
    pub use crate::props::{PropBag, UserProps};
    pub use crate::row::{Row, RowData};
    pub use crate::state::{TableState, Updater};
    pub use crate::table::{Table, TableOptions};
}
