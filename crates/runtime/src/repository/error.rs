//! Error types raised by repository implementations.

use thiserror::Error;
use tracker_core::{ErrorSeverity, TrackerError};

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("save repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("unsupported save format version {found} (this build reads up to {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("invalid slot name '{0}': use letters, digits, '-' or '_'")]
    InvalidSlot(String),
}

impl TrackerError for RepositoryError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidSlot(_) => ErrorSeverity::Validation,
            Self::UnsupportedVersion { .. } | Self::CorruptedData(_) | Self::Json(_) => {
                ErrorSeverity::Recoverable
            }
            Self::LockPoisoned | Self::Io(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "REPOSITORY_LOCK_POISONED",
            Self::Io(_) => "REPOSITORY_IO",
            Self::Json(_) => "REPOSITORY_JSON",
            Self::CorruptedData(_) => "REPOSITORY_CORRUPTED",
            Self::UnsupportedVersion { .. } => "REPOSITORY_UNSUPPORTED_VERSION",
            Self::InvalidSlot(_) => "REPOSITORY_INVALID_SLOT",
        }
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
