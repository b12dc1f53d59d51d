//! Error message verbosity

use super::TableError;

/// Selects how much detail error messages carry.
///
/// Both levels build the same [`TableError`] variant; only the message
/// differs. Verbose messages name the missing id and the operation, terse
/// messages carry the error kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorVerbosity {
    /// `[Table] could not find row with id r9`
    Verbose,
    /// `not found`
    Terse,
}

impl Default for ErrorVerbosity {
    /// `Verbose` when debug assertions are enabled, `Terse` otherwise.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            Self::Verbose
        } else {
            Self::Terse
        }
    }
}

impl ErrorVerbosity {
    /// Builds a [`TableError::NotFound`], formatting the detail only when
    /// verbose.
    pub fn not_found(self, detail: impl FnOnce() -> String) -> TableError {
        match self {
            Self::Verbose => TableError::not_found(format!("[Table] {}", detail())),
            Self::Terse => TableError::not_found("not found"),
        }
    }

    /// Builds a [`TableError::InvariantViolation`], formatting the detail only
    /// when verbose.
    pub fn invariant(self, detail: impl FnOnce() -> String) -> TableError {
        match self {
            Self::Verbose => TableError::invariant(format!("[Table] {}", detail())),
            Self::Terse => TableError::invariant("invariant violation"),
        }
    }
}
