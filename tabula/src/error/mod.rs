//! Error types

mod table;
mod verbosity;

pub use table::*;
pub use verbosity::*;
