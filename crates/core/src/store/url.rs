//! Bidirectional mapping between blob URLs and blob names.

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use url::Url;

use super::config::StoreConfig;

/// Characters escaped inside a single path segment of a blob URL.
///
/// Beyond the characters a URL path cannot carry raw, this set covers the
/// quote and bracket characters that terminate free-text URL scanning, so a
/// canonical URL always survives embedding in card descriptions.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'\'')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'(')
    .add(b')')
    .add(b'[')
    .add(b']')
    .add(b'\\')
    .add(b'^')
    .add(b'|');

/// Maps blob names to canonical store URLs and back.
///
/// The canonical form is `https://{account}.{suffix}/{container}/{name}` with
/// each `/`-separated segment of the name percent-encoded, so names carrying
/// reserved characters round-trip.
#[derive(Debug, Clone)]
pub struct BlobUrlCodec {
    account: String,
    container: String,
    endpoint_suffix: String,
}

impl BlobUrlCodec {
    /// Create a codec over the given store configuration.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            account: config.account().to_string(),
            container: config.container().to_string(),
            endpoint_suffix: config.endpoint_suffix().to_string(),
        }
    }

    /// Canonical URL for a blob name, with no credential attached.
    #[must_use]
    pub fn url_for(&self, blob_name: &str) -> String {
        let encoded = blob_name
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "https://{}.{}/{}/{}",
            self.account, self.endpoint_suffix, self.container, encoded
        )
    }

    /// Extract the blob name addressed by a store URL.
    ///
    /// Drops the container segment, rejoins the remaining path segments, and
    /// percent-decodes each. Returns `None` when the URL does not parse, has
    /// no path segment past the container, or decodes to an empty name —
    /// callers treat that as "absent", not an error.
    #[must_use]
    pub fn blob_name(&self, url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let mut segments = parsed.path_segments()?;

        // First segment is the container.
        segments.next()?;

        let mut parts = Vec::new();
        for segment in segments {
            let decoded = percent_decode_str(segment).decode_utf8().ok()?;
            parts.push(decoded.into_owned());
        }
        if parts.is_empty() {
            return None;
        }

        let name = parts.join("/");
        if name.trim().is_empty() {
            return None;
        }
        Some(name)
    }

    /// Whether a URL belongs to this store (as opposed to an arbitrary
    /// external link). Checked before attempting [`Self::blob_name`].
    #[must_use]
    pub fn is_managed(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        host == self.endpoint_suffix || host.ends_with(&format!(".{}", self.endpoint_suffix))
    }
}


#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;

    /// Strategy for a single blob name segment: no `/`, non-empty after trim.
    fn name_segment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ._%()-]{0,19}"
    }

    fn blob_name_strategy() -> impl Strategy<Value = String> {
        proptest::collection::vec(name_segment(), 1..4).prop_map(|parts| parts.join("/"))
    }

    // Property: decoding the canonical URL of any valid blob name yields
    // the original name.
    proptest! {
        #[test]
        fn prop_url_round_trip(name in blob_name_strategy()) {
            let config = StoreConfig::new(
                "acct",
                "Zmxvd2RlY2stdGVzdC1rZXk=",
                "container",
            )
            .expect("valid config");
            let codec = BlobUrlCodec::new(&config);

            let url = codec.url_for(&name);
            prop_assert!(codec.is_managed(&url));
            prop_assert_eq!(codec.blob_name(&url), Some(name));
        }
    }
}
