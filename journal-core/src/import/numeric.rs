//! Numeric field parsing for import files.
//!
//! Broker exports put currency symbols, percent signs and stray text next to
//! numbers. The lenient parser reads the longest leading number and ignores
//! the rest; the strict parser accepts only a complete number.

/// Longest leading decimal literal: optional sign, digits with an optional
/// fraction, optional exponent. Leading whitespace must already be trimmed.
fn numeric_prefix(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0;

    if i < len && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }

    let int_start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;

    let mut frac_digits = 0;
    if i < len && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_digits = j - frac_start;
        if int_digits + frac_digits > 0 {
            i = j;
        }
    }

    if int_digits + frac_digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    Some(&s[..i])
}

/// Parse the leading number of a field. `None` when there is no usable number.
///
/// `"12.5%"` → 12.5, `" -3 "` → -3, `"$40"` → `None`, `"1e400"` → `None`.
pub fn parse_lenient(raw: &str) -> Option<f64> {
    let prefix = numeric_prefix(raw.trim())?;
    prefix.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a field that must be a complete number.
///
/// Empty (after trimming) → `Ok(None)`; anything that is not a finite number
/// in its entirety → `Err(())`.
#[allow(clippy::result_unit_err)]
pub fn parse_strict(raw: &str) -> Result<Option<f64>, ()> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match numeric_prefix(trimmed) {
        Some(prefix) if prefix.len() == trimmed.len() => prefix
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Some)
            .ok_or(()),
        _ => Err(()),
    }
}
