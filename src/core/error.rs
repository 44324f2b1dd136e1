//! Error types for the graph core

use std::path::PathBuf;

use thiserror::Error;

/// Failures reading or writing the record store
#[derive(Error, Debug)]
pub enum StorageError {
    /// Store exists but could not be read
    #[error("Failed to load memory store {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store could not be written or replaced
    #[error("Failed to save memory store {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized during save
    #[error("Failed to encode {kind} record: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced by graph operations
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Entity with name {0} not found")]
    EntityNotFound(String),

    /// Caller-supplied metadata that cannot be scored
    #[error("Invalid emotional metadata for {entity}: {reason}")]
    Scoring { entity: String, reason: String },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Coarse error families, used by adapters to label failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Preference,
    Scoring,
    Storage,
}

impl MemoryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MemoryError::EntityNotFound(_) => ErrorCategory::Preference,
            MemoryError::Scoring { .. } => ErrorCategory::Scoring,
            MemoryError::Storage(_) => ErrorCategory::Storage,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Preference => write!(f, "Preference error"),
            ErrorCategory::Scoring => write!(f, "Scoring error"),
            ErrorCategory::Storage => write!(f, "Storage error"),
        }
    }
}

pub type MemoryResult<T> = std::result::Result<T, MemoryError>;
