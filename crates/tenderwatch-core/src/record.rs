//! Parsed tender records and their normalization into the canonical
//! field vocabulary.

use crate::normalize::{normalize_currency_phrase, normalize_date, normalize_text};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tenderwatch_core_types::schema::{CURRENCY_FIELDS, DATE_FIELDS};

/// One parsed record handed over by the ingestion collaborator: raw field
/// strings plus the identity of where and when it was captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTenderRecord {
    /// Source identity (e.g. sender address or portal name)
    pub source_identity: String,
    /// Run/category scope this record was captured in
    pub run_id: String,
    /// Stable business key shared by all snapshots of the same tender
    pub tender_ref: String,
    /// Raw field name → raw value, as extracted by the parser
    pub fields: BTreeMap<String, String>,
    /// Raw document body for the fingerprint gate, when the source
    /// delivers one (email ingestion); absent for pre-parsed feeds
    #[serde(default)]
    pub document: Option<String>,
}

/// Normalize every raw field into its canonical comparable form.
///
/// Date fields become `YYYY-MM-DD` or the explicit empty marker when
/// unparseable; currency fields become a base-unit amount rendered without
/// a trailing `.0`; everything else is whitespace-normalized text. A field
/// that fails normalization degrades to empty; it never aborts the record.
pub fn normalize_fields(raw: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let mut normalized = BTreeMap::new();
    for (field, value) in raw {
        let canonical = if DATE_FIELDS.contains(&field.as_str()) {
            normalize_date(value).unwrap_or_default()
        } else if CURRENCY_FIELDS.contains(&field.as_str()) {
            format_amount(normalize_currency_phrase(value))
        } else {
            normalize_text(value)
        };
        normalized.insert(field.clone(), canonical);
    }
    normalized
}

/// Render a base-unit amount: integral values without a decimal tail.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 9_007_199_254_740_992.0 {
        format!("{}", amount as i64)
    } else {
        format!("{}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderwatch_core_types::schema::{F_DUE_DATE, F_TENDER_BRIEF, F_TENDER_VALUE};

    fn raw(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_normalize_fields_by_class() {
        let fields = raw(&[
            (F_DUE_DATE, "10-01-2025"),
            (F_TENDER_VALUE, "6.6 crore"),
            (F_TENDER_BRIEF, "  Widening of   NH-44 "),
        ]);
        let normalized = normalize_fields(&fields);
        assert_eq!(normalized[F_DUE_DATE], "2025-01-10");
        assert_eq!(normalized[F_TENDER_VALUE], "66000000");
        assert_eq!(normalized[F_TENDER_BRIEF], "Widening of NH-44");
    }

    #[test]
    fn test_unparseable_date_degrades_to_empty() {
        let fields = raw(&[(F_DUE_DATE, "To be announced"), (F_TENDER_VALUE, "100 lakh")]);
        let normalized = normalize_fields(&fields);
        // Local recovery: the bad field is absent, the rest survives
        assert_eq!(normalized[F_DUE_DATE], "");
        assert_eq!(normalized[F_TENDER_VALUE], "10000000");
    }

    #[test]
    fn test_unknown_fields_are_treated_as_text() {
        let fields = raw(&[("department", "  Public Works  ")]);
        let normalized = normalize_fields(&fields);
        assert_eq!(normalized["department"], "Public Works");
    }

    #[test]
    fn test_fractional_amount_keeps_decimals() {
        assert_eq!(format_amount(1234.56), "1234.56");
        assert_eq!(format_amount(66_000_000.0), "66000000");
    }
}
