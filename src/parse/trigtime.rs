//! `TRIGTIME` per-segment trigger-time extraction.
//!
//! The body is a CR-LF block in which each data line carries two
//! scientific-notation numbers: the trigger time and the trigger offset.
//! Their sum is the absolute start time of one segment, and line order is
//! segment order. The body also carries non-data lines (the echoed command
//! header, column headings, blank lines); those are classified and skipped
//! explicitly rather than swallowed, so a malformed data line shows up in
//! logs instead of silently shrinking the segment count.

use super::number::scan_scientific;
use crate::error::{AppResult, ScopeError};
use log::debug;

/// Parses a `INSPECT? "TRIGTIME"` response body into absolute segment start
/// times, in seconds, in line order.
///
/// Fails with [`ScopeError::NoTriggerData`] when no line matches the
/// two-number pattern.
pub fn parse_trigger_times(body: &str) -> AppResult<Vec<f64>> {
    let mut times = Vec::new();
    for line in body.lines() {
        match classify_line(line) {
            Some((trigger, offset)) => times.push(trigger + offset),
            None => {
                let trimmed = line.trim();
                if !trimmed.is_empty() {
                    debug!("Skipping non-data TRIGTIME line: '{trimmed}'");
                }
            }
        }
    }
    if times.is_empty() {
        return Err(ScopeError::NoTriggerData);
    }
    Ok(times)
}

/// A data line is exactly two numeric tokens separated by whitespace and/or
/// a comma, with nothing else on the line.
fn classify_line(line: &str) -> Option<(f64, f64)> {
    let rest = line.trim_start();
    let (first, consumed) = scan_scientific(rest).ok()?;
    let rest = skip_separators(&rest[consumed..]);
    let (second, consumed) = scan_scientific(rest).ok()?;
    let rest = rest[consumed..].trim();
    if !rest.is_empty() {
        return None;
    }
    Some((first, second))
}

fn skip_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',')
}
