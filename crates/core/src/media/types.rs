//! Media types and data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::MediaError;

/// Kind of media attached to a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    /// Audio attachment.
    Audio,
    /// Video attachment.
    Video,
}

/// A card's media attachment: a stored reference plus its kind.
///
/// The pairing is a single tagged unit - a card can never hold a URL without
/// a kind or a kind without a URL. Cards without media carry
/// `Option<MediaAttachment>::None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Stored media reference: a full blob URL or a legacy bare blob name.
    pub url: String,
    /// Kind of the attached media.
    pub kind: MediaKind,
}

impl MediaAttachment {
    /// Create an attachment.
    #[must_use]
    pub fn new(url: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }

    /// Bridge the legacy two-column storage shape into the tagged unit.
    ///
    /// A blank URL counts as absent. Both fields present yields an
    /// attachment, both absent yields `None`, and a partial pair is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::PartialAttachment`] when exactly one of the two
    /// fields is present.
    pub fn from_parts(
        url: Option<String>,
        kind: Option<MediaKind>,
    ) -> Result<Option<Self>, MediaError> {
        let url = url.filter(|u| !u.trim().is_empty());
        match (url, kind) {
            (Some(url), Some(kind)) => Ok(Some(Self { url, kind })),
            (None, None) => Ok(None),
            _ => Err(MediaError::PartialAttachment),
        }
    }
}

/// The card fields this subsystem reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardMedia {
    /// Free-text description; may embed pasted blob URLs.
    pub description: Option<String>,
    /// Structured media attachment, if any.
    pub attachment: Option<MediaAttachment>,
}

impl CardMedia {
    /// Create card media fields.
    #[must_use]
    pub fn new(description: Option<String>, attachment: Option<MediaAttachment>) -> Self {
        Self {
            description,
            attachment,
        }
    }
}

/// Result of issuing upload credentials for a new blob.
#[derive(Debug, Clone, Serialize)]
pub struct UploadGrant {
    /// URL carrying the create+write credential; valid for the upload only.
    pub upload_url: String,
    /// URL carrying the read credential, for immediate playback.
    pub media_url: String,
    /// Name of the blob the credentials are scoped to.
    pub blob_name: String,
    /// When the upload credential expires.
    pub upload_expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts_both_present() {
        let attachment = MediaAttachment::from_parts(
            Some("https://acct.blob.core.windows.net/c/a.mp4".to_string()),
            Some(MediaKind::Video),
        )
        .expect("valid pair");
        assert_eq!(
            attachment,
            Some(MediaAttachment::new(
                "https://acct.blob.core.windows.net/c/a.mp4",
                MediaKind::Video
            ))
        );
    }

    #[test]
    fn test_from_parts_both_absent() {
        let attachment = MediaAttachment::from_parts(None, None).expect("valid pair");
        assert_eq!(attachment, None);
    }

    #[test]
    fn test_from_parts_url_without_kind_rejected() {
        let err = MediaAttachment::from_parts(Some("https://x/y/z.mp3".to_string()), None)
            .unwrap_err();
        assert!(matches!(err, MediaError::PartialAttachment));
    }

    #[test]
    fn test_from_parts_kind_without_url_rejected() {
        let err = MediaAttachment::from_parts(None, Some(MediaKind::Audio)).unwrap_err();
        assert!(matches!(err, MediaError::PartialAttachment));
    }

    #[test]
    fn test_from_parts_blank_url_is_absent() {
        let attachment = MediaAttachment::from_parts(Some("   ".to_string()), None)
            .expect("blank url counts as absent");
        assert_eq!(attachment, None);

        // Blank url plus a kind is still a partial pair.
        let err = MediaAttachment::from_parts(Some(String::new()), Some(MediaKind::Audio))
            .unwrap_err();
        assert!(matches!(err, MediaError::PartialAttachment));
    }

    #[test]
    fn test_media_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&MediaKind::Audio).expect("serializes"),
            "\"audio\""
        );
        assert_eq!(
            serde_json::to_string(&MediaKind::Video).expect("serializes"),
            "\"video\""
        );
    }
}
