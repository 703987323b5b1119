//! Store error types.

use thiserror::Error;

/// Blob store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store configuration error (fatal at initialization).
    #[error("store configuration error: {0}")]
    Configuration(String),

    /// Blob not found in the store.
    #[error("blob not found: {name}")]
    NotFound {
        /// Blob name that was not found.
        name: String,
    },

    /// SAS signing failed.
    #[error("credential signing failed: {0}")]
    Signing(String),

    /// OpenDAL operation error.
    #[error("store operation failed: {0}")]
    Operation(String),
}

impl StoreError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create a signing error.
    #[must_use]
    pub fn signing(msg: impl Into<String>) -> Self {
        Self::Signing(msg.into())
    }

    /// Create an operation error.
    #[must_use]
    pub fn operation(msg: impl Into<String>) -> Self {
        Self::Operation(msg.into())
    }
}

impl From<opendal::Error> for StoreError {
    fn from(err: opendal::Error) -> Self {
        match err.kind() {
            opendal::ErrorKind::NotFound => Self::NotFound {
                name: err.to_string(),
            },
            _ => Self::Operation(err.to_string()),
        }
    }
}
