//! Currency phrase normalization to a single base unit (rupees).

/// Regional unit words and their base-unit multipliers.
const UNIT_MULTIPLIERS: &[(&str, f64)] = &[
    ("crore", 10_000_000.0),
    ("lakh", 100_000.0),
    ("thousand", 1_000.0),
];

/// Interpret a currency-like phrase as a base-unit amount.
///
/// A trailing unit word ("crore", "lakh", "thousand") multiplies the
/// leading numeric portion; absent a recognized unit, non-numeric
/// characters are stripped and the remainder parsed directly. Returns
/// `0.0` on total failure; callers never see an error from here.
///
/// Examples: `"6.6 crore"` → `66000000.0`, `"Rs. 100 Lakh"` →
/// `10000000.0`, `"50000000"` → `50000000.0`.
pub fn normalize_currency_phrase(text: &str) -> f64 {
    let lower = text.to_lowercase();

    for (unit, multiplier) in UNIT_MULTIPLIERS {
        if lower.contains(unit) {
            return parse_numeric_portion(&lower).map_or(0.0, |n| n * multiplier);
        }
    }

    parse_numeric_portion(&lower).unwrap_or(0.0)
}

/// Strip everything but digits and decimal points, then parse.
///
/// Thousands separators vanish with the other punctuation; a value with
/// more than one surviving dot fails the parse and falls back to zero.
fn parse_numeric_portion(text: &str) -> Option<f64> {
    let numeric: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if numeric.is_empty() {
        return None;
    }
    numeric.parse::<f64>().ok()
}
