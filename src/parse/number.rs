//! Scientific-notation token scanner shared by all response-body parsers.
//!
//! The LC574AL emits every numeric value in full scientific notation:
//!
//! ```text
//! [+-] digits '.' digits [eE] [+-] digits      e.g. -2.50000000e-07
//! ```
//!
//! The decimal point and the exponent (marker plus digits) are mandatory.
//! This is deliberately stricter than `str::parse::<f64>`: a response in
//! which the instrument drops the exponent or the decimal point is out of
//! spec, and it should fail here instead of being silently accepted.

use crate::error::{AppResult, ScopeError};

/// Upper bound on the text quoted back in a `MalformedNumber` error.
const SPAN_LIMIT: usize = 24;

/// Scans the longest scientific-notation prefix of `input`.
///
/// Returns the parsed value together with the number of characters consumed
/// (the matched characters are all ASCII, so bytes and characters agree).
/// Fails with [`ScopeError::MalformedNumber`] when `input` does not start
/// with a token of the required shape.
pub fn scan_scientific(input: &str) -> AppResult<(f64, usize)> {
    let bytes = input.as_bytes();
    let mut pos = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        pos = 1;
    }

    let int_end = take_digits(bytes, pos);
    if int_end == pos {
        return Err(malformed(input));
    }
    pos = int_end;

    if bytes.get(pos) != Some(&b'.') {
        return Err(malformed(input));
    }
    pos += 1;

    let frac_end = take_digits(bytes, pos);
    if frac_end == pos {
        return Err(malformed(input));
    }
    pos = frac_end;

    if !matches!(bytes.get(pos), Some(b'e' | b'E')) {
        return Err(malformed(input));
    }
    pos += 1;

    if matches!(bytes.get(pos), Some(b'+' | b'-')) {
        pos += 1;
    }

    let exp_end = take_digits(bytes, pos);
    if exp_end == pos {
        return Err(malformed(input));
    }
    pos = exp_end;

    let value = input[..pos].parse::<f64>().map_err(|_| malformed(input))?;
    Ok((value, pos))
}

fn take_digits(bytes: &[u8], from: usize) -> usize {
    let mut pos = from;
    while matches!(bytes.get(pos), Some(b'0'..=b'9')) {
        pos += 1;
    }
    pos
}

fn malformed(input: &str) -> ScopeError {
    ScopeError::MalformedNumber {
        span: input.chars().take(SPAN_LIMIT).collect(),
    }
}
