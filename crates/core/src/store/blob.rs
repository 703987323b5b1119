//! Blob operations over OpenDAL.

use opendal::{ErrorKind, Operator, services};

use super::config::StoreConfig;
use super::error::StoreError;

/// The store operations the cleanup pass needs.
///
/// Implemented by [`BlobStore`] in production; tests supply hand mocks for
/// failure injection.
pub trait BlobOps: Send + Sync {
    /// Check whether a blob exists.
    fn exists(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<bool, StoreError>> + Send;

    /// Delete a blob. Deleting an absent blob is not an error.
    fn delete(&self, name: &str)
    -> impl std::future::Future<Output = Result<(), StoreError>> + Send;
}

/// Blob store backed by an OpenDAL operator.
pub struct BlobStore {
    operator: Operator,
}

impl BlobStore {
    /// Create a blob store from the validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let builder = services::Azblob::default()
            .endpoint(&config.blob_endpoint())
            .account_name(config.account())
            .account_key(config.access_key())
            .container(config.container());

        let operator = Operator::new(builder)
            .map_err(|e| StoreError::configuration(e.to_string()))?
            .finish();

        Ok(Self { operator })
    }

    /// Wrap an existing operator. Tests use this with the memory backend.
    #[must_use]
    pub fn new(operator: Operator) -> Self {
        Self { operator }
    }
}

impl BlobOps for BlobStore {
    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        match self.operator.stat(name).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StoreError::from(e)),
        }
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        match self.operator.delete(name).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::from(e)),
        }
    }
}
