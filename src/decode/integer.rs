//! Decimal integer parsing with `atoi` / stream-extraction semantics.
//!
//! Both parsers are locale-independent, skip leading ASCII whitespace,
//! accept an optional sign and stop at the first non-digit byte. Input with
//! no digits yields 0.

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Split text into (negative, digit run).
fn split_sign_digits(text: &[u8]) -> (bool, &[u8]) {
    let start = text
        .iter()
        .position(|&b| !is_space(b))
        .unwrap_or(text.len());
    let rest = &text[start..];

    let (negative, rest) = match rest.first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let end = rest
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    (negative, &rest[..end])
}

/// Parse a decimal integer the way `atoi` does on a 64-bit C library.
///
/// Out-of-range values saturate at `i64::MIN` / `i64::MAX`; narrower
/// targets truncate the result with `as`.
pub fn parse_decimal(text: &[u8]) -> i64 {
    let (negative, digits) = split_sign_digits(text);

    let mut value: i64 = 0;
    for &d in digits {
        let digit = (d - b'0') as i64;
        let next = if negative {
            value.checked_mul(10).and_then(|v| v.checked_sub(digit))
        } else {
            value.checked_mul(10).and_then(|v| v.checked_add(digit))
        };
        match next {
            Some(v) => value = v,
            None => return if negative { i64::MIN } else { i64::MAX },
        }
    }
    value
}

/// Parse an unsigned 64-bit integer the way a numeric stream extraction does.
///
/// A leading `-` negates in two's complement; overflow yields `u64::MAX`.
/// Anything after the digit run is ignored.
pub fn parse_unsigned_stream(text: &[u8]) -> u64 {
    let (negative, digits) = split_sign_digits(text);

    let mut value: u64 = 0;
    for &d in digits {
        match value
            .checked_mul(10)
            .and_then(|v| v.checked_add((d - b'0') as u64))
        {
            Some(v) => value = v,
            None => return u64::MAX,
        }
    }

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}
