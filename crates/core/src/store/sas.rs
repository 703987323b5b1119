//! Scoped SAS credential signing.
//!
//! Signing is purely local HMAC-SHA256 computation over the service SAS
//! string-to-sign; no network call is involved, so it is safe to run inline
//! on the request path. Every credential is scoped to exactly one blob via
//! the canonicalized resource, never container-wide.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::Sha256;

use super::config::StoreConfig;
use super::error::StoreError;
use super::url::BlobUrlCodec;

/// Storage service version stamped into every credential.
pub const SERVICE_VERSION: &str = "2022-11-02";

/// Transport constraint stamped into every credential. Credentials are never
/// accepted over unencrypted transport.
const PROTOCOL: &str = "https";

/// Query-value escaping: everything but unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

type HmacSha256 = Hmac<Sha256>;

/// The two permission sets this subsystem ever issues.
///
/// A closed enum rather than a free-form permission string, so a credential
/// broader than its use case is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SasPermissions {
    /// Read a single blob. Issued for media playback.
    Read,
    /// Create and write a single blob. Issued for uploads only.
    CreateWrite,
}

impl SasPermissions {
    /// Permission token as it appears in the `sp` query field.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Read => "r",
            Self::CreateWrite => "cw",
        }
    }

    /// Time-to-live for credentials carrying this permission set.
    #[must_use]
    pub fn ttl(self) -> Duration {
        match self {
            Self::Read => Duration::minutes(60),
            Self::CreateWrite => Duration::minutes(5),
        }
    }
}

/// A freshly issued, time-limited blob URL.
#[derive(Debug, Clone)]
pub struct SignedBlobUrl {
    /// Full blob URL with the SAS query string attached.
    pub url: String,
    /// When the credential expires.
    pub expires_at: DateTime<Utc>,
}

/// Issue a credentialed URL for one blob, expiring after the permission
/// set's time-to-live from now.
///
/// # Errors
///
/// Returns [`StoreError::Signing`] if the HMAC cannot be keyed.
pub fn signed_blob_url(
    config: &StoreConfig,
    blob_name: &str,
    permissions: SasPermissions,
) -> Result<SignedBlobUrl, StoreError> {
    let expires_at = Utc::now() + permissions.ttl();
    signed_blob_url_at(config, blob_name, permissions, expires_at)
}

/// Issue a credentialed URL with an explicit expiry instant.
///
/// Deterministic for fixed inputs; the public issuance path is
/// [`signed_blob_url`], which injects the current time.
///
/// # Errors
///
/// Returns [`StoreError::Signing`] if the HMAC cannot be keyed.
pub fn signed_blob_url_at(
    config: &StoreConfig,
    blob_name: &str,
    permissions: SasPermissions,
    expires_at: DateTime<Utc>,
) -> Result<SignedBlobUrl, StoreError> {
    let expiry = expires_at.format("%Y-%m-%dT%H:%M:%SZ").to_string();
    let signature = sign(config, blob_name, permissions, &expiry)?;

    let query = format!(
        "sv={}&spr={}&se={}&sr=b&sp={}&sig={}",
        SERVICE_VERSION,
        PROTOCOL,
        utf8_percent_encode(&expiry, QUERY_VALUE),
        permissions.token(),
        utf8_percent_encode(&signature, QUERY_VALUE),
    );

    let base = BlobUrlCodec::new(config).url_for(blob_name);
    Ok(SignedBlobUrl {
        url: format!("{base}?{query}"),
        expires_at,
    })
}

/// HMAC-SHA256 over the service SAS string-to-sign, base64-encoded.
fn sign(
    config: &StoreConfig,
    blob_name: &str,
    permissions: SasPermissions,
    expiry: &str,
) -> Result<String, StoreError> {
    // Canonicalized resource pins the credential to exactly one blob.
    let resource = format!(
        "/blob/{}/{}/{}",
        config.account(),
        config.container(),
        blob_name
    );

    // Service SAS string-to-sign, sv 2020-12-06 and later field order.
    let string_to_sign = [
        permissions.token(),
        "", // start time
        expiry,
        resource.as_str(),
        "", // signed identifier
        "", // source IP range
        PROTOCOL,
        SERVICE_VERSION,
        "b", // resource type: single blob
        "", // snapshot time
        "", // encryption scope
        "", // rscc
        "", // rscd
        "", // rsce
        "", // rscl
        "", // rsct
    ]
    .join("\n");

    let mut mac = HmacSha256::new_from_slice(config.key_bytes())
        .map_err(|e| StoreError::signing(e.to_string()))?;
    mac.update(string_to_sign.as_bytes());

    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    const TEST_KEY: &str = "Zmxvd2RlY2stdGVzdC1rZXk=";

    fn config() -> StoreConfig {
        StoreConfig::new("acct", TEST_KEY, "container").expect("valid config")
    }

    fn query_field<'a>(url: &'a str, field: &str) -> Option<&'a str> {
        let (_, query) = url.split_once('?')?;
        query
            .split('&')
            .find_map(|pair| pair.strip_prefix(&format!("{field}=")))
    }

    #[test]
    fn test_upload_permissions_exactly_create_write() {
        let signed =
            signed_blob_url(&config(), "a.mp4", SasPermissions::CreateWrite).expect("signs");
        assert_eq!(query_field(&signed.url, "sp"), Some("cw"));
    }

    #[test]
    fn test_read_permissions_exactly_read() {
        let signed = signed_blob_url(&config(), "a.mp4", SasPermissions::Read).expect("signs");
        assert_eq!(query_field(&signed.url, "sp"), Some("r"));
    }

    #[test]
    fn test_https_only_protocol() {
        for permissions in [SasPermissions::Read, SasPermissions::CreateWrite] {
            let signed = signed_blob_url(&config(), "a.mp4", permissions).expect("signs");
            assert_eq!(query_field(&signed.url, "spr"), Some("https"));
            assert!(signed.url.starts_with("https://"));
        }
    }

    #[test]
    fn test_upload_expiry_within_five_minutes() {
        let before = Utc::now();
        let signed =
            signed_blob_url(&config(), "a.mp4", SasPermissions::CreateWrite).expect("signs");
        assert!(signed.expires_at <= before + Duration::minutes(5) + Duration::seconds(2));
        assert!(signed.expires_at > before + Duration::minutes(4));
    }

    #[test]
    fn test_read_expiry_within_sixty_minutes() {
        let before = Utc::now();
        let signed = signed_blob_url(&config(), "a.mp4", SasPermissions::Read).expect("signs");
        assert!(signed.expires_at <= before + Duration::minutes(60) + Duration::seconds(2));
        assert!(signed.expires_at > before + Duration::minutes(59));
    }

    #[test]
    fn test_signing_is_deterministic() {
        let expires_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap();
        let a = signed_blob_url_at(&config(), "a.mp4", SasPermissions::Read, expires_at)
            .expect("signs");
        let b = signed_blob_url_at(&config(), "a.mp4", SasPermissions::Read, expires_at)
            .expect("signs");
        assert_eq!(a.url, b.url);
    }

    #[test]
    fn test_signature_scoped_to_blob_name() {
        let expires_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap();
        let a = signed_blob_url_at(&config(), "a.mp4", SasPermissions::Read, expires_at)
            .expect("signs");
        let b = signed_blob_url_at(&config(), "b.mp4", SasPermissions::Read, expires_at)
            .expect("signs");
        assert_ne!(
            query_field(&a.url, "sig"),
            query_field(&b.url, "sig")
        );
    }

    #[test]
    fn test_url_carries_expiry_and_single_blob_resource() {
        let expires_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().unwrap();
        let signed = signed_blob_url_at(&config(), "a.mp4", SasPermissions::Read, expires_at)
            .expect("signs");
        assert_eq!(
            query_field(&signed.url, "se"),
            Some("2026-03-01T12%3A00%3A00Z")
        );
        assert_eq!(query_field(&signed.url, "sr"), Some("b"));
        assert_eq!(query_field(&signed.url, "sv"), Some(SERVICE_VERSION));
        assert!(
            signed
                .url
                .starts_with("https://acct.blob.core.windows.net/container/a.mp4?")
        );
    }
}
