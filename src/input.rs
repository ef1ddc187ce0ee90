// 🔢 Input Coercion - form text → safe numbers
//
// Every value typed into a form is normalized here before it reaches a
// simulator. Malformed text never propagates as an error: it becomes 0
// (or the field default for month counts).

use std::num::IntErrorKind;

/// Shortest and longest horizon accepted by the investment form
pub const MIN_MONTHS: u32 = 1;
pub const MAX_MONTHS: u32 = 360;

/// Parse a currency or percentage field.
///
/// Accepts a decimal comma ("12,50") and ignores trailing garbage the way a
/// browser `parseFloat` does ("12abc" → 12). Anything unparseable, non-finite
/// or negative becomes 0.
pub fn parse_amount(text: &str) -> f64 {
    let normalized = text.trim().replace(',', ".");
    let prefix = numeric_prefix(&normalized, true);

    match prefix.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Parse a month count, falling back to `default` for malformed or zero input.
/// The result is clamped to `MIN_MONTHS..=MAX_MONTHS`.
pub fn parse_months(text: &str, default: u32) -> u32 {
    let trimmed = text.trim();
    let prefix = numeric_prefix(trimmed, false);

    let months = match prefix.parse::<i64>() {
        Ok(0) => default as i64,
        Ok(value) => value,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => default as i64,
        },
    };

    months.clamp(MIN_MONTHS as i64, MAX_MONTHS as i64) as u32
}

/// Longest leading slice that looks like a number: optional sign, digits,
/// and (when `allow_fraction`) a single decimal point followed by digits and
/// an exponent such as "e3" or "E-2".
fn numeric_prefix(text: &str, allow_fraction: bool) -> &str {
    let bytes = text.as_bytes();
    let mut end = 0;

    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if allow_fraction && end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        // "12." keeps only "12"
        if fraction_end > fraction_start {
            end = fraction_end;
            has_digits = true;
        }
    }

    if allow_fraction && has_digits && end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'-' || bytes[exp_end] == b'+') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        // "1e" keeps only "1"
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    if has_digits {
        &text[..end]
    } else {
        ""
    }
}
