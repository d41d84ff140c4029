//! Decimal normalization for scraped price text
//!
//! Storefront text uses `.` as the thousands separator and `,` as the
//! decimal mark (`5.499,00 TL`). Machine-readable sources (JSON-LD, meta
//! `content` attributes, script state) use a plain decimal point.

use rust_decimal::Decimal;
use std::str::FromStr;

const NBSP: char = '\u{00A0}';
const NARROW_NBSP: char = '\u{202F}';

/// How a raw candidate string is expected to be written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Human-facing text with thousands dots and decimal comma
    Locale,
    /// Plain decimal first, locale rules as a fallback
    Machine,
}

/// Parse locale-formatted price text into a positive decimal
///
/// Dots are removed before commas are turned into decimal points; doing it
/// the other way round would turn `5.499,00` into `5.49900`.
pub fn normalize_price(raw: &str) -> Option<Decimal> {
    let cleaned: String = raw
        .replace([NBSP, NARROW_NBSP], "")
        .replace('.', "")
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return None;
    }

    Decimal::from_str(cleaned).ok().filter(is_positive)
}

/// Parse a machine-formatted value, falling back to locale rules
pub fn normalize_machine_price(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    match Decimal::from_str(trimmed) {
        Ok(value) => Some(value).filter(is_positive),
        Err(_) => normalize_price(trimmed),
    }
}

/// Normalize according to the source's expected format
pub fn normalize_with(raw: &str, format: NumberFormat) -> Option<Decimal> {
    match format {
        NumberFormat::Locale => normalize_price(raw),
        NumberFormat::Machine => normalize_machine_price(raw),
    }
}

fn is_positive(value: &Decimal) -> bool {
    value.is_sign_positive() && !value.is_zero()
}
