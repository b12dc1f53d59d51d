//! Table error types

/// Errors raised by table construction and lookups.
///
/// Lookups are deterministic over the current structural snapshot, so none
/// of these are retryable: the outcome only changes once the table is
/// rebuilt or its data replaced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A row or cell id is absent from the current snapshot.
    #[error("{message}")]
    NotFound {
        /// Human-readable description (terse or verbose).
        message: String,
    },

    /// A caller or feature referenced a column id that was never registered,
    /// or the column tree itself is malformed.
    #[error("{message}")]
    InvariantViolation {
        /// Human-readable description (terse or verbose).
        message: String,
    },

    /// A feature's extension pass failed.
    #[error("feature `{feature}` failed: {message}")]
    Feature {
        /// Name of the failing feature.
        feature: &'static str,
        /// Description of the failure.
        message: String,
    },
}

impl TableError {
    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Creates an invariant violation error.
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Creates an error reported by a feature's extension pass.
    pub fn feature(feature: &'static str, message: impl Into<String>) -> Self {
        Self::Feature {
            feature,
            message: message.into(),
        }
    }

    /// Returns `true` if this is a [`TableError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a [`TableError::InvariantViolation`].
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation { .. })
    }

    /// Returns the message carried by the error.
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound { message }
            | Self::InvariantViolation { message }
            | Self::Feature { message, .. } => message,
        }
    }
}
