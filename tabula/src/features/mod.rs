//! Built-in features

mod cells;
mod visibility;

pub use cells::*;
pub use visibility::*;
