//! Numeric cell parsing with currency and thousands-separator handling.

use once_cell::sync::Lazy;
use regex::Regex;

/// Currency symbols stripped before parsing.
pub const CURRENCY_SYMBOLS: &[char] = &[
    '$', '€', '£', '¥', '₩', '₽', '₪', '₺', '₴', '₸', '฿', '₫', '₭', '₱', '﷼', '₨', '₹', '₲', '₵',
    '₳', '₿', '₾', '₮', '₡', '₢', '₤', '₣', '₯', '₠', '₥', '₦', '₧', '₰',
];

// Optional leading minus, integer part either plain or grouped in threes,
// optional fraction. The digit requirement is checked separately.
static NUMERIC_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?(?:[0-9]+|[0-9]{1,3}(?:,[0-9]{3})+)?(?:\.[0-9]*)?$").unwrap()
});

/// Parse a raw cell string into a number.
///
/// Currency symbols, whitespace and punctuation other than `.`, `,` and `-`
/// are discarded. Any remaining letter rejects the value, as do misplaced
/// minus signs, multiple decimal points and commas outside valid thousands
/// groups.
///
/// ```
/// use gridsight::parse_numeric;
///
/// assert_eq!(parse_numeric("$1,234.50"), Some(1234.5));
/// assert_eq!(parse_numeric("-€20"), Some(-20.0));
/// assert_eq!(parse_numeric("1,23"), None);
/// assert_eq!(parse_numeric("N/A"), None);
/// ```
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut cleaned = String::with_capacity(trimmed.len());
    for ch in trimmed.chars() {
        if ch.is_ascii_digit() || matches!(ch, '.' | ',' | '-') {
            cleaned.push(ch);
        } else if CURRENCY_SYMBOLS.contains(&ch) {
            continue;
        } else if ch.is_alphabetic() {
            return None;
        }
    }

    if !cleaned.bytes().any(|b| b.is_ascii_digit()) || !NUMERIC_PATTERN.is_match(&cleaned) {
        return None;
    }

    cleaned
        .replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Returns true if the value parses as a number.
pub fn is_numeric(raw: &str) -> bool {
    parse_numeric(raw).is_some()
}
