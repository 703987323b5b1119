//! Media error types.

use thiserror::Error;

use crate::store::StoreError;

/// Media operation errors.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Upload requested without a file name.
    #[error("file name is required")]
    EmptyFileName,

    /// Card has no media attachment to operate on.
    #[error("card has no media attachment")]
    NoAttachment,

    /// Media URL and media kind must be provided together.
    #[error("media url and media kind must be provided together")]
    PartialAttachment,

    /// A stored media reference could not be resolved to a blob name.
    #[error("cannot resolve blob name from media reference: {reference}")]
    UnresolvedReference {
        /// The reference that failed to resolve.
        reference: String,
    },

    /// Underlying store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MediaError {
    /// Create an unresolved reference error.
    #[must_use]
    pub fn unresolved(reference: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            reference: reference.into(),
        }
    }
}
