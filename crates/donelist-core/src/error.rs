//! Error types for storage operations
//!
//! The store is treated as an external document database: any failure of a
//! backend operation surfaces as a [`StoreError`] and maps to a backend
//! failure at the API boundary. "Record not found" is not an error here:
//! lookups return `Option` so the service layer can give it a distinct
//! status.

use std::fmt;

/// Failure of a document-store operation.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// The backend rejected or failed the operation.
    Backend { reason: String },

    /// A record could not be encoded or decoded.
    Serialization { reason: String },

    /// Disk or connection level failure.
    Io { reason: String },

    /// No backend connection was available.
    PoolExhausted,
}

impl StoreError {
    /// Create a backend failure from any displayable cause.
    pub fn backend(reason: impl fmt::Display) -> Self {
        Self::Backend {
            reason: reason.to_string(),
        }
    }

    /// Create a serialization failure from any displayable cause.
    pub fn serialization(reason: impl fmt::Display) -> Self {
        Self::Serialization {
            reason: reason.to_string(),
        }
    }

    /// Create an I/O failure from any displayable cause.
    pub fn io(reason: impl fmt::Display) -> Self {
        Self::Io {
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Backend { reason } => write!(f, "store operation failed: {}", reason),
            Self::Serialization { reason } => {
                write!(f, "store serialization failed: {}", reason)
            }
            Self::Io { reason } => write!(f, "store I/O failed: {}", reason),
            Self::PoolExhausted => write!(f, "no store connection available"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
