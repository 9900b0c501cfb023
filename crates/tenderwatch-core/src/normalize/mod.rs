//! Lenient normalization of heterogeneous upstream values.
//!
//! Upstream sources disagree about date shapes and quote monetary amounts
//! as regional phrases ("6.6 crore"). These functions make such values
//! comparable. The parsing policy is a hard contract: pure, stateless,
//! never panicking, never letting an error escape. Callers always get a
//! concrete value or an explicit absent marker.

mod currency;
mod date;

pub use currency::normalize_currency_phrase;
pub use date::normalize_date;

/// Trim and collapse interior whitespace runs to single spaces.
///
/// Used for free-text fields so that re-scraped formatting noise does not
/// register as a content change.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_collapses_runs() {
        assert_eq!(
            normalize_text("  Road   widening\t\tproject \n Phase II "),
            "Road widening project Phase II"
        );
    }

    #[test]
    fn test_normalize_text_empty() {
        assert_eq!(normalize_text("   "), "");
    }
}
