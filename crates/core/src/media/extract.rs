//! Blob reference extraction from card fields.

use std::collections::BTreeSet;

use regex::Regex;

use crate::store::{BlobUrlCodec, StoreConfig};

/// Finds every blob this store owns that a card references.
///
/// Card descriptions are free text and may embed pasted blob URLs in
/// addition to (or instead of) the structured attachment, so both sources
/// are scanned; otherwise an edit or deletion would leave orphaned blobs.
#[derive(Debug, Clone)]
pub struct ReferenceExtractor {
    pattern: Regex,
    codec: BlobUrlCodec,
}

impl ReferenceExtractor {
    /// Build an extractor for the configured store. The URL pattern is
    /// compiled once here and reused for every scan.
    #[must_use]
    pub fn new(config: &StoreConfig) -> Self {
        let suffix = regex::escape(config.endpoint_suffix());
        // Store URL: host under the endpoint suffix, container segment, then
        // a blob path terminated at whitespace or quote/bracket characters.
        let pattern = Regex::new(&format!(
            r#"https://[^/\s]+\.{suffix}/[^/\s]+/[^\s"')\]]+"#
        ))
        .expect("escaped endpoint suffix always yields a valid pattern");

        Self {
            pattern,
            codec: BlobUrlCodec::new(config),
        }
    }

    /// Collect the blob names referenced by a card's free text and
    /// structured attachment URL.
    ///
    /// Deduplicates on decoded names, so the same blob referenced under
    /// different encodings or in both sources counts once. Matches that fail
    /// to decode are skipped and never abort the pass.
    #[must_use]
    pub fn extract(
        &self,
        free_text: Option<&str>,
        structured_url: Option<&str>,
    ) -> BTreeSet<String> {
        let mut names = BTreeSet::new();

        if let Some(text) = free_text {
            for found in self.pattern.find_iter(text) {
                if let Some(name) = self.codec.blob_name(found.as_str()) {
                    names.insert(name);
                }
            }
        }

        if let Some(url) = structured_url
            && self.codec.is_managed(url)
            && let Some(name) = self.codec.blob_name(url)
        {
            names.insert(name);
        }

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ReferenceExtractor {
        let config = StoreConfig::new(
            "acct",
            "Zmxvd2RlY2stdGVzdC1rZXk=",
            "container",
        )
        .expect("valid config");
        ReferenceExtractor::new(&config)
    }

    #[test]
    fn test_duplicate_in_free_text_counts_once() {
        let text = "see https://acct.blob.core.windows.net/container/abc-123.mp4 \
                    and https://acct.blob.core.windows.net/container/abc-123.mp4";
        let names = extractor().extract(Some(text), None);
        assert_eq!(names.len(), 1);
        assert!(names.contains("abc-123.mp4"));
    }

    #[test]
    fn test_structured_url_deduplicated_against_free_text() {
        let url = "https://acct.blob.core.windows.net/container/abc-123.mp4";
        let text = format!("listen here: {url} and also {url}");
        let names = extractor().extract(Some(&text), Some(url));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_unmanaged_structured_url_ignored() {
        let names = extractor().extract(None, Some("https://example.com/container/x.mp4"));
        assert!(names.is_empty());
    }

    #[test]
    fn test_match_terminates_at_quotes_and_brackets() {
        let text = concat!(
            "\"https://acct.blob.core.windows.net/container/a.mp4\" ",
            "(https://acct.blob.core.windows.net/container/b.mp3) ",
            "[https://acct.blob.core.windows.net/container/c.mp4]"
        );
        let names = extractor().extract(Some(text), None);
        assert_eq!(
            names.into_iter().collect::<Vec<_>>(),
            vec!["a.mp4", "b.mp3", "c.mp4"]
        );
    }

    #[test]
    fn test_encoded_and_plain_reference_count_once() {
        let text = "https://acct.blob.core.windows.net/container/folder%2Fa%20b.mp3 \
                    https://acct.blob.core.windows.net/container/folder/a%20b.mp3";
        let names = extractor().extract(Some(text), None);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["folder/a b.mp3"]);
    }

    #[test]
    fn test_external_links_in_text_ignored() {
        let text = "see https://example.com/watch?v=abc and \
                    https://acct.blob.core.windows.net/container/real.mp4";
        let names = extractor().extract(Some(text), None);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["real.mp4"]);
    }

    #[test]
    fn test_empty_inputs_yield_empty_set() {
        assert!(extractor().extract(None, None).is_empty());
        assert!(extractor().extract(Some("no media here"), None).is_empty());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "https://acct.blob.core.windows.net/container/a.mp4 and more text";
        let e = extractor();
        let first = e.extract(Some(text), None);
        let second = e.extract(Some(text), None);
        assert_eq!(first, second);
    }
}

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;

    use super::*;

    // Property: extraction never panics and is idempotent on arbitrary text.
    proptest! {
        #[test]
        fn prop_extract_idempotent_on_arbitrary_text(text in ".{0,200}") {
            let config = StoreConfig::new(
                "acct",
                "Zmxvd2RlY2stdGVzdC1rZXk=",
                "container",
            )
            .expect("valid config");
            let extractor = ReferenceExtractor::new(&config);

            let first = extractor.extract(Some(&text), None);
            let second = extractor.extract(Some(&text), None);
            prop_assert_eq!(first, second);
        }
    }
}
