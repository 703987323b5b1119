//! Validated store configuration.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use flowdeck_shared::StorageSettings;

use super::error::StoreError;

/// Default blob endpoint host suffix.
pub const DEFAULT_ENDPOINT_SUFFIX: &str = "blob.core.windows.net";

/// Process-wide blob store configuration.
///
/// Constructed once at process start and passed by reference to every
/// component that needs it. Construction validates the account identity,
/// access key, and container up front so that a misconfigured process
/// refuses to start instead of failing per request.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    account: String,
    container: String,
    endpoint_suffix: String,
    /// Account key exactly as configured, handed to the OpenDAL operator.
    access_key: String,
    /// Decoded account key bytes used for SAS signing.
    key_bytes: Vec<u8>,
}

impl StoreConfig {
    /// Create a validated store configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] if the account, access key, or
    /// container is missing, or if the access key is not valid base64.
    pub fn new(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Result<Self, StoreError> {
        Self::with_endpoint_suffix(account, access_key, container, DEFAULT_ENDPOINT_SUFFIX)
    }

    /// Create a validated store configuration with a non-default endpoint
    /// suffix (sovereign clouds, emulators).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] on any missing or invalid field.
    pub fn with_endpoint_suffix(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
        endpoint_suffix: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let account = non_empty("storage account", account.into())?;
        let access_key = non_empty("storage access key", access_key.into())?;
        let container = non_empty("storage container", container.into())?;
        let endpoint_suffix = non_empty("storage endpoint suffix", endpoint_suffix.into())?;

        let key_bytes = BASE64.decode(access_key.as_bytes()).map_err(|e| {
            StoreError::configuration(format!("storage access key is not valid base64: {e}"))
        })?;

        Ok(Self {
            account,
            container,
            endpoint_suffix,
            access_key,
            key_bytes,
        })
    }

    /// Build from the raw settings loaded by `flowdeck-shared`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Configuration`] on any missing or invalid field.
    pub fn from_settings(settings: &StorageSettings) -> Result<Self, StoreError> {
        Self::with_endpoint_suffix(
            settings.account.clone(),
            settings.access_key.clone(),
            settings.container.clone(),
            settings.endpoint_suffix.clone(),
        )
    }

    /// Storage account name.
    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Container holding all media blobs.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Host suffix of the blob endpoint.
    #[must_use]
    pub fn endpoint_suffix(&self) -> &str {
        &self.endpoint_suffix
    }

    /// Account key as configured (base64), for the storage operator.
    #[must_use]
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Decoded account key bytes, for SAS signing.
    #[must_use]
    pub fn key_bytes(&self) -> &[u8] {
        &self.key_bytes
    }

    /// Full blob service endpoint, e.g. `https://acct.blob.core.windows.net`.
    #[must_use]
    pub fn blob_endpoint(&self) -> String {
        format!("https://{}.{}", self.account, self.endpoint_suffix)
    }
}

fn non_empty(field: &str, value: String) -> Result<String, StoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StoreError::configuration(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}
