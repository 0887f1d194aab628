//! `WAVEDESC` descriptor-field extraction.
//!
//! The descriptor body is dozens of `NAME : value` lines describing the
//! current acquisition. Only two of them matter here: the horizontal sample
//! interval and the total sample count across all segments. Everything else
//! is ignored, and the two required fields are located by search rather than
//! positional parsing because the instrument does not guarantee field order.

use super::number::scan_scientific;
use crate::error::{AppResult, ScopeError};

/// Field name of the per-sample time step, in seconds.
const HORIZ_INTERVAL: &str = "HORIZ_INTERVAL";

/// Field name of the total sample count summed over all segments.
const WAVE_ARRAY_COUNT: &str = "WAVE_ARRAY_COUNT";

/// The two descriptor fields the acquisition needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Descriptor {
    /// Time between consecutive samples, seconds. Always positive.
    pub horiz_interval: f64,
    /// Total number of samples across all segments. Always positive.
    pub wave_array_count: u64,
}

/// Extracts the required fields from a `INSPECT? "WAVEDESC"` response body.
///
/// For each field the first line of the form `<NAME> : <number>` wins
/// (whitespace-tolerant around the colon). Missing fields fail with
/// [`ScopeError::MissingField`]; a value that is not full scientific
/// notation fails with [`ScopeError::MalformedNumber`]; a non-positive
/// interval or a non-positive-integer count fails with
/// [`ScopeError::InvalidFieldValue`].
pub fn parse_descriptor(body: &str) -> AppResult<Descriptor> {
    let horiz_interval = find_field(body, HORIZ_INTERVAL)?;
    if horiz_interval <= 0.0 {
        return Err(ScopeError::InvalidFieldValue {
            field: HORIZ_INTERVAL,
            value: horiz_interval,
        });
    }

    let count = find_field(body, WAVE_ARRAY_COUNT)?;
    if count <= 0.0 || count.fract() != 0.0 {
        return Err(ScopeError::InvalidFieldValue {
            field: WAVE_ARRAY_COUNT,
            value: count,
        });
    }

    Ok(Descriptor {
        horiz_interval,
        wave_array_count: count as u64,
    })
}

/// Finds the first `<name> : <number>` line in `body` and scans its value.
fn find_field(body: &str, name: &'static str) -> AppResult<f64> {
    for line in body.lines() {
        let Some(at) = line.find(name) else {
            continue;
        };
        let after = line[at + name.len()..].trim_start();
        let Some(value_text) = after.strip_prefix(':') else {
            continue;
        };
        let (value, _) = scan_scientific(value_text.trim_start())?;
        return Ok(value);
    }
    Err(ScopeError::MissingField(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = concat!(
        "C1:INSP \"\r\n",
        "INSTRUMENT_NAME     : LECROYLC574AL\r\n",
        "WAVE_ARRAY_COUNT    : 2.0000000e+01\r\n",
        "VERTICAL_GAIN       : 4.8830000e-05\r\n",
        "HORIZ_INTERVAL      : 1.0000000e-01\r\n",
        "\"\r\n",
    );

    #[test]
    fn extracts_both_required_fields() {
        let descriptor = parse_descriptor(BODY).unwrap();
        assert_eq!(descriptor.horiz_interval, 0.1);
        assert_eq!(descriptor.wave_array_count, 20);
    }

    #[test]
    fn field_order_does_not_matter() {
        let swapped = "HORIZ_INTERVAL : 2.5000000e-09\r\nWAVE_ARRAY_COUNT : 5.0000000e+03\r\n";
        let descriptor = parse_descriptor(swapped).unwrap();
        assert_eq!(descriptor.horiz_interval, 2.5e-9);
        assert_eq!(descriptor.wave_array_count, 5000);
    }

    #[test]
    fn missing_interval_is_reported_by_name() {
        let body = "WAVE_ARRAY_COUNT : 1.0000000e+02\r\n";
        assert!(matches!(
            parse_descriptor(body),
            Err(ScopeError::MissingField("HORIZ_INTERVAL"))
        ));
    }

    #[test]
    fn missing_count_is_reported_by_name() {
        let body = "HORIZ_INTERVAL : 1.0000000e-09\r\n";
        assert!(matches!(
            parse_descriptor(body),
            Err(ScopeError::MissingField("WAVE_ARRAY_COUNT"))
        ));
    }

    #[test]
    fn lax_number_format_is_rejected() {
        let body = "HORIZ_INTERVAL : 0.0001\r\nWAVE_ARRAY_COUNT : 1.0000000e+02\r\n";
        assert!(matches!(
            parse_descriptor(body),
            Err(ScopeError::MalformedNumber { .. })
        ));
    }

    #[test]
    fn fractional_sample_count_is_invalid() {
        let body = "HORIZ_INTERVAL : 1.0e-09\r\nWAVE_ARRAY_COUNT : 2.5000000e+00\r\n";
        assert!(matches!(
            parse_descriptor(body),
            Err(ScopeError::InvalidFieldValue {
                field: "WAVE_ARRAY_COUNT",
                ..
            })
        ));
    }

    #[test]
    fn non_positive_interval_is_invalid() {
        let body = "HORIZ_INTERVAL : -1.0e-09\r\nWAVE_ARRAY_COUNT : 2.0000000e+01\r\n";
        assert!(matches!(
            parse_descriptor(body),
            Err(ScopeError::InvalidFieldValue {
                field: "HORIZ_INTERVAL",
                ..
            })
        ));
    }

    #[test]
    fn zero_count_is_invalid() {
        let body = "HORIZ_INTERVAL : 1.0e-09\r\nWAVE_ARRAY_COUNT : 0.0000000e+00\r\n";
        assert!(matches!(
            parse_descriptor(body),
            Err(ScopeError::InvalidFieldValue {
                field: "WAVE_ARRAY_COUNT",
                ..
            })
        ));
    }

    #[test]
    fn reparse_is_identical() {
        assert_eq!(parse_descriptor(BODY).unwrap(), parse_descriptor(BODY).unwrap());
    }
}
