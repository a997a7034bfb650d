//! Lenient number parsing shared by the metadata extractor and the form parser.
//!
//! Slicer headers and hand-typed form fields both carry numbers with trailing
//! noise (`"12.50\n"`, `"1250g"`, `"7.82 m"`). [`parse_leading_f64`] reads the
//! longest numeric prefix and ignores the rest, so a trailing unit or a second
//! decimal point never turns a readable value into a failure.

/// Parse the leading numeric prefix of `s`, skipping leading whitespace.
///
/// Accepts an optional sign, digits with at most one decimal point, and an
/// optional exponent. Returns `None` when no digit appears before the first
/// non-numeric character.
///
/// ```
/// use spoolwise_lib::metadata::numbers::parse_leading_f64;
///
/// assert_eq!(parse_leading_f64("  12.5g"), Some(12.5));
/// assert_eq!(parse_leading_f64("1.2.3"), Some(1.2));
/// assert_eq!(parse_leading_f64("g12"), None);
/// ```
pub fn parse_leading_f64(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    let mut digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            digits += 1;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Sum a comma-separated list of numbers (multi-extruder totals).
///
/// Fragments without a readable number contribute zero.
pub fn sum_comma_separated(s: &str) -> f64 {
    s.split(',')
        .map(|part| parse_leading_f64(part.trim()).unwrap_or(0.0))
        .sum()
}
