//! Blob store access: configuration, SAS signing, URL codec, and cleanup.
//!
//! This module owns everything that touches the object store:
//! - Validated, fail-fast store configuration
//! - Scoped SAS credential signing (pure local computation, no network)
//! - Bidirectional mapping between blob URLs and blob names
//! - OpenDAL-backed blob operations behind the `BlobOps` seam
//! - Best-effort concurrent cleanup of unreferenced blobs

mod blob;
mod cleanup;
mod config;
mod error;
mod sas;
mod url;

pub use blob::{BlobOps, BlobStore};
pub use cleanup::{delete_blobs, BlobOutcome, CleanupReport};
pub use config::StoreConfig;
pub use error::StoreError;
pub use sas::{signed_blob_url, signed_blob_url_at, SasPermissions, SignedBlobUrl};
pub use url::BlobUrlCodec;
