//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the domain models and repositories so clients can
//! bubble them up with consistent context.
use thiserror::Error;
use tracker_core::{CombatError, EntityError, ErrorSeverity, PopulationError, TrackerError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, SessionError>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Population(#[from] PopulationError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

impl SessionError {
    /// Severity used by frontends to choose how loudly to report the error.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Population(e) => e.severity(),
            Self::Entity(e) => e.severity(),
            Self::Combat(e) => e.severity(),
            Self::Repository(e) => e.severity(),
            Self::NothingToUndo | Self::NothingToRedo => ErrorSeverity::Recoverable,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Population(e) => e.error_code(),
            Self::Entity(e) => e.error_code(),
            Self::Combat(e) => e.error_code(),
            Self::Repository(e) => e.error_code(),
            Self::NothingToUndo => "SESSION_NOTHING_TO_UNDO",
            Self::NothingToRedo => "SESSION_NOTHING_TO_REDO",
        }
    }
}
