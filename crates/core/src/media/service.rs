//! Media service implementation.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::MediaError;
use super::extract::ReferenceExtractor;
use super::types::{CardMedia, MediaAttachment, UploadGrant};
use crate::store::{
    BlobOps, BlobStore, BlobUrlCodec, CleanupReport, SasPermissions, StoreConfig, delete_blobs,
    signed_blob_url,
};

/// Facade over the media subsystem.
///
/// Stateless per request: it holds the process-wide read-only configuration,
/// the compiled extraction pattern, and a shared store handle. Safe to share
/// across concurrent requests.
pub struct MediaService<S: BlobOps> {
    config: StoreConfig,
    codec: BlobUrlCodec,
    extractor: ReferenceExtractor,
    store: Arc<S>,
}

impl MediaService<BlobStore> {
    /// Create the service over the production blob store.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be initialized.
    pub fn from_config(config: StoreConfig) -> Result<Self, MediaError> {
        let store = BlobStore::from_config(&config)?;
        Ok(Self::new(config, Arc::new(store)))
    }
}

impl<S: BlobOps + 'static> MediaService<S> {
    /// Create the service over an explicit store handle.
    #[must_use]
    pub fn new(config: StoreConfig, store: Arc<S>) -> Self {
        let codec = BlobUrlCodec::new(&config);
        let extractor = ReferenceExtractor::new(&config);
        Self {
            config,
            codec,
            extractor,
            store,
        }
    }

    /// Issue upload credentials for a new media file.
    ///
    /// The blob name is `{uuid}-{file_name}`, unique by construction. The
    /// returned grant carries a create+write URL valid for five minutes and
    /// a read URL valid for one hour.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::EmptyFileName`] for a blank file name, or a
    /// store error if signing fails.
    pub fn issue_upload(&self, file_name: &str) -> Result<UploadGrant, MediaError> {
        let file_name = file_name.trim();
        if file_name.is_empty() {
            return Err(MediaError::EmptyFileName);
        }

        let blob_name = format!("{}-{}", Uuid::new_v4(), file_name);

        let upload = signed_blob_url(&self.config, &blob_name, SasPermissions::CreateWrite)?;
        let read = signed_blob_url(&self.config, &blob_name, SasPermissions::Read)?;

        info!(blob = %blob_name, "issued upload credentials");
        Ok(UploadGrant {
            upload_url: upload.url,
            media_url: read.url,
            blob_name,
            upload_expires_at: upload.expires_at,
        })
    }

    /// Re-issue a read URL for a card whose previously issued URL failed to
    /// load.
    ///
    /// Called reactively by the consumer, never on a schedule, and issues
    /// exactly once per call: if the fresh credential also fails client-side
    /// the consumer surfaces a terminal "media unavailable" state instead of
    /// looping.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::NoAttachment`] when the card has no media, or
    /// [`MediaError::UnresolvedReference`] when the stored reference cannot
    /// be mapped to a blob name.
    pub fn refresh_read_url(&self, card: &CardMedia) -> Result<String, MediaError> {
        let attachment = card.attachment.as_ref().ok_or(MediaError::NoAttachment)?;
        let blob_name = self.resolve_blob_name(&attachment.url)?;

        let signed = signed_blob_url(&self.config, &blob_name, SasPermissions::Read)?;
        Ok(signed.url)
    }

    /// The card's attachment with a freshly issued read URL, for card
    /// fetches.
    ///
    /// Falls back to the stored URL when resolution or signing fails, so a
    /// card fetch never breaks on a stale reference; the failure is logged.
    #[must_use]
    pub fn fresh_attachment(&self, card: &CardMedia) -> Option<MediaAttachment> {
        let attachment = card.attachment.as_ref()?;

        let fresh_url = self
            .resolve_blob_name(&attachment.url)
            .and_then(|name| {
                signed_blob_url(&self.config, &name, SasPermissions::Read).map_err(MediaError::from)
            })
            .map(|signed| signed.url);

        match fresh_url {
            Ok(url) => Some(MediaAttachment::new(url, attachment.kind)),
            Err(e) => {
                warn!(reference = %attachment.url, error = %e, "read url refresh failed, keeping stored url");
                Some(attachment.clone())
            }
        }
    }

    /// All blob names a card references, across description free text and
    /// the structured attachment.
    #[must_use]
    pub fn extract_references(&self, card: &CardMedia) -> BTreeSet<String> {
        self.extractor.extract(
            card.description.as_deref(),
            card.attachment.as_ref().map(|a| a.url.as_str()),
        )
    }

    /// Dispatch a detached cleanup sweep for every blob a deleted card
    /// referenced.
    ///
    /// Must be called after the card's deletion has been committed and
    /// acknowledged - the sweep is advisory and never blocks or rolls back
    /// the triggering mutation. Returns `None` without spawning when the
    /// card references no blobs. The returned handle may be dropped; work
    /// lost on shutdown is acceptable.
    pub fn queue_cleanup(&self, card: &CardMedia) -> Option<JoinHandle<CleanupReport>> {
        self.spawn_sweep(self.extract_references(card))
    }

    /// Dispatch a detached cleanup sweep for the blobs an edit dropped:
    /// those referenced before the edit and no longer referenced after.
    ///
    /// Same dispatch contract as [`Self::queue_cleanup`].
    pub fn queue_cleanup_diff(
        &self,
        before: &CardMedia,
        after: &CardMedia,
    ) -> Option<JoinHandle<CleanupReport>> {
        let kept = self.extract_references(after);
        let dropped = self
            .extract_references(before)
            .into_iter()
            .filter(|name| !kept.contains(name))
            .collect();
        self.spawn_sweep(dropped)
    }

    fn spawn_sweep(&self, names: BTreeSet<String>) -> Option<JoinHandle<CleanupReport>> {
        if names.is_empty() {
            return None;
        }

        info!(blobs = names.len(), "queueing blob cleanup");
        let store = Arc::clone(&self.store);
        Some(tokio::spawn(async move {
            delete_blobs(store.as_ref(), names).await
        }))
    }

    /// Map a stored media reference to a blob name, handling both storage
    /// shapes: managed full URLs are decoded, anything else is treated as a
    /// legacy bare blob name.
    fn resolve_blob_name(&self, reference: &str) -> Result<String, MediaError> {
        if self.codec.is_managed(reference) {
            return self
                .codec
                .blob_name(reference)
                .ok_or_else(|| MediaError::unresolved(reference));
        }
        Ok(reference.to_string())
    }
}
