//! Date normalization to canonical `YYYY-MM-DD` form.

use chrono::NaiveDate;

/// Day-first formats attempted after the explicit fast paths, in preference
/// order. The source region writes day before month, so day-first shapes
/// come first and `%Y/%m/%d` is the only year-first entry.
const FLEXIBLE_FORMATS: &[&str] = &[
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%d %B, %Y",
    "%d/%m/%y",
    "%Y/%m/%d",
];

/// Datetime shapes seen in portal exports; the time part is discarded.
const FLEXIBLE_DATETIME_FORMATS: &[&str] = &[
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// Convert various upstream date formats to canonical `YYYY-MM-DD`.
///
/// Already-canonical ISO-shaped strings are range-checked and returned
/// unchanged. `DD-MM-YYYY` (the dominant upstream shape) is checked
/// explicitly next, then a fixed list of day-first formats is attempted.
/// Returns `None` if the input cannot be interpreted as a date; never
/// panics and never returns an error.
pub fn normalize_date(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    // Fast path: canonical YYYY-MM-DD, validated and returned as-is
    if let Some((y, m, d)) = split_dashed_triplet(text, 4, 2, 2) {
        return if in_range(y, m, d) && NaiveDate::from_ymd_opt(y, m, d).is_some() {
            Some(text.to_string())
        } else {
            None
        };
    }

    // Fast path: explicit DD-MM-YYYY
    if let Some((y, m, d)) = split_dashed_triplet(text, 2, 2, 4) {
        if in_range(y, m, d) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return Some(date.format("%Y-%m-%d").to_string());
            }
        }
        return None;
    }

    // Flexible parsing, day-before-month preference
    for fmt in FLEXIBLE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, fmt) {
            return Some(date.format("%Y-%m-%d").to_string());
        }
    }
    for fmt in FLEXIBLE_DATETIME_FORMATS {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date().format("%Y-%m-%d").to_string());
        }
    }

    None
}

/// Split a 10-ish character dashed triplet into integers, with the given
/// expected segment widths. Returns `None` unless all three segments are
/// pure digits of exactly the expected widths.
fn split_dashed_triplet(text: &str, w1: usize, w2: usize, w3: usize) -> Option<(i32, u32, u32)> {
    if text.len() != w1 + w2 + w3 + 2 {
        return None;
    }
    let mut parts = text.split('-');
    let a = parts.next()?;
    let b = parts.next()?;
    let c = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    if a.len() != w1 || b.len() != w2 || c.len() != w3 {
        return None;
    }
    if ![a, b, c].iter().all(|p| p.bytes().all(|ch| ch.is_ascii_digit())) {
        return None;
    }
    // Widths 4/2/2 mean year-first; 2/2/4 means year-last
    if w1 == 4 {
        Some((a.parse().ok()?, b.parse().ok()?, c.parse().ok()?))
    } else {
        Some((c.parse().ok()?, b.parse().ok()?, a.parse().ok()?))
    }
}

fn in_range(year: i32, month: u32, day: u32) -> bool {
    (1900..=2100).contains(&year) && (1..=12).contains(&month) && (1..=31).contains(&day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_iso_passthrough() {
        assert_eq!(normalize_date("2025-01-10"), Some("2025-01-10".to_string()));
        assert_eq!(normalize_date(" 2025-12-31 "), Some("2025-12-31".to_string()));
    }

    #[test]
    fn test_iso_invalid_calendar_date_rejected() {
        assert_eq!(normalize_date("2025-02-30"), None);
        assert_eq!(normalize_date("2025-13-01"), None);
        // Out of supported year range
        assert_eq!(normalize_date("1850-01-01"), None);
    }

    #[test]
    fn test_day_first_dashed() {
        assert_eq!(normalize_date("10-01-2025"), Some("2025-01-10".to_string()));
        assert_eq!(normalize_date("31-12-2024"), Some("2024-12-31".to_string()));
        assert_eq!(normalize_date("32-01-2025"), None);
    }

    #[test]
    fn test_flexible_formats() {
        assert_eq!(normalize_date("10/01/2025"), Some("2025-01-10".to_string()));
        assert_eq!(normalize_date("10.01.2025"), Some("2025-01-10".to_string()));
        assert_eq!(normalize_date("10-Jan-2025"), Some("2025-01-10".to_string()));
        assert_eq!(normalize_date("10 January 2025"), Some("2025-01-10".to_string()));
        assert_eq!(normalize_date("10 January, 2025"), Some("2025-01-10".to_string()));
        assert_eq!(normalize_date("2025/01/10"), Some("2025-01-10".to_string()));
    }

    #[test]
    fn test_day_first_preference_on_ambiguous_input() {
        // 05/03 reads as 5 March, not 3 May
        assert_eq!(normalize_date("05/03/2025"), Some("2025-03-05".to_string()));
    }

    #[test]
    fn test_datetime_inputs_keep_date_part() {
        assert_eq!(
            normalize_date("10-01-2025 15:30"),
            Some("2025-01-10".to_string())
        );
        assert_eq!(
            normalize_date("2025-01-10 15:30:00"),
            Some("2025-01-10".to_string())
        );
    }

    #[test]
    fn test_unparseable_returns_none() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("   "), None);
        assert_eq!(normalize_date("To be announced"), None);
        assert_eq!(normalize_date("10th-ish of Jan"), None);
    }

    proptest! {
        // For all valid ISO-shaped date strings d, normalize_date(d) == d
        #[test]
        fn prop_valid_iso_is_identity(y in 1900i32..=2100, m in 1u32..=12, d in 1u32..=28) {
            let iso = format!("{:04}-{:02}-{:02}", y, m, d);
            prop_assert_eq!(normalize_date(&iso), Some(iso.clone()));
        }

        // Never panics on arbitrary input
        #[test]
        fn prop_total_on_arbitrary_input(s in "\\PC{0,40}") {
            let _ = normalize_date(&s);
        }
    }
}
