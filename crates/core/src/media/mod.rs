//! Card-facing media layer.
//!
//! This module provides the attachment model, blob reference extraction from
//! card fields, and the `MediaService` facade:
//! - Upload credential issuance
//! - Reactive read-URL refresh
//! - Fresh read URLs on card fetch
//! - Detached cleanup dispatch on card deletion and edit

mod error;
mod extract;
mod service;
mod types;

pub use error::MediaError;
pub use extract::ReferenceExtractor;
pub use service::MediaService;
pub use types::{CardMedia, MediaAttachment, MediaKind, UploadGrant};
