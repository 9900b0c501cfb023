//! Structural template fingerprinting for inbound documents.
//!
//! A source whose template silently changes shape corrupts every parsed
//! field downstream, so the document's *structure* is hashed and gated
//! against a per-source baseline before any content is trusted. The
//! fingerprint is invariant to free text and dynamic URLs but sensitive to
//! tag and attribute structure.
//!
//! ## Pipeline
//!
//! 1. Walk the document as a markup tree ([`extract_template_structure`])
//! 2. Hash the normalized structure with SHA-256 ([`fingerprint_document`])

mod structure;

pub use structure::extract_template_structure;

use sha2::{Digest, Sha256};

/// Number of fingerprint characters quoted in operator-facing messages.
pub const PREFIX_LEN: usize = 16;

/// Compute the structural fingerprint of a document.
///
/// Returns the lowercase hex-encoded SHA-256 digest (64 characters) of the
/// normalized structural serialization. Deterministic for a given input;
/// lenient on malformed markup (the walkable prefix is what gets hashed).
pub fn fingerprint_document(body: &str) -> String {
    let structure = extract_template_structure(body);
    let mut hasher = Sha256::new();
    hasher.update(structure.as_bytes());
    hex::encode(hasher.finalize())
}

/// Truncated fingerprint for diagnostics.
pub fn hash_prefix(fingerprint: &str) -> &str {
    &fingerprint[..fingerprint.len().min(PREFIX_LEN)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEMPLATE: &str = r#"
        <html><body>
          <div class="tender-row" id="row-1">
            <span class="title">Road widening NH-44</span>
            <a href="https://portal.example.com/tender/8841">View</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_fingerprint_shape() {
        let fp = fingerprint_document(TEMPLATE);
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint_document(TEMPLATE), fingerprint_document(TEMPLATE));
    }

    #[test]
    fn test_fingerprint_invariant_to_text_and_urls() {
        let changed_content = TEMPLATE
            .replace("Road widening NH-44", "Bridge construction SH-12")
            .replace("https://portal.example.com/tender/8841", "https://other.example.net/x?y=2");
        assert_eq!(fingerprint_document(TEMPLATE), fingerprint_document(&changed_content));
    }

    #[test]
    fn test_fingerprint_sensitive_to_structure() {
        let changed_tag = TEMPLATE.replace("<span class=\"title\">", "<p class=\"title\">");
        assert_ne!(fingerprint_document(TEMPLATE), fingerprint_document(&changed_tag));

        let changed_class = TEMPLATE.replace("class=\"tender-row\"", "class=\"tender-card\"");
        assert_ne!(fingerprint_document(TEMPLATE), fingerprint_document(&changed_class));
    }

    #[test]
    fn test_hash_prefix() {
        let fp = fingerprint_document(TEMPLATE);
        assert_eq!(hash_prefix(&fp).len(), PREFIX_LEN);
        assert!(fp.starts_with(hash_prefix(&fp)));
    }

    proptest! {
        // Fingerprinting is total and deterministic on arbitrary input
        #[test]
        fn prop_fingerprint_total_and_deterministic(s in "\\PC{0,200}") {
            let a = fingerprint_document(&s);
            let b = fingerprint_document(&s);
            prop_assert_eq!(&a, &b);
            prop_assert_eq!(a.len(), 64);
        }
    }
}
