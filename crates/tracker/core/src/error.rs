//! Common error infrastructure for tracker-core.
//!
//! Domain-specific errors (`PopulationError`, `CombatError`, ...) live next to
//! the models they guard. This module provides the shared severity
//! classification so frontends can decide how loudly to report a failure.

/// Severity level of an error, used to pick how a frontend reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// The request does not fit the current state; the user can try something else.
    ///
    /// Examples: acting out of turn, beginning combat with no rolls
    Recoverable,

    /// Invalid input that should be corrected before retrying.
    ///
    /// Examples: empty name, zero speed, unknown entity
    Validation,

    /// Internal inconsistency between models. Indicates a bug.
    Internal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all tracker-core errors.
pub trait TrackerError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Static identifier for this error variant, used in logs and tests.
    fn error_code(&self) -> &'static str;
}
