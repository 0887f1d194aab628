//! `SIMPLE` segmented-sample extraction.
//!
//! The body is a quoted region containing one block per segment. A block is
//! a `Segment No <int>` marker followed by that segment's samples as
//! scientific-notation tokens, separated by whitespace and/or commas. The
//! labels must be strictly increasing; beyond that check they are discarded,
//! because block order of appearance is the segment order.
//!
//! Every block in one response must have the same sample count: all segments
//! of a channel share one time axis, so a short block means a half-captured
//! acquisition and fails the whole parse.

use super::number::scan_scientific;
use crate::error::{AppResult, ScopeError};
use log::debug;

/// Marker text opening each segment block inside the quoted region.
const SEGMENT_MARKER: &str = "Segment";

/// Parses a `INSPECT? "SIMPLE"` response body into one sample array per
/// segment, in order of appearance.
///
/// `channel` is the channel identifier (e.g. `"C1"`) carried into every
/// error for diagnosis.
pub fn parse_segments(channel: &str, body: &str) -> AppResult<Vec<Vec<f64>>> {
    let region = quoted_region(channel, body)?;
    let mut blocks: Vec<Vec<f64>> = Vec::new();
    let mut last_label: Option<u64> = None;
    let mut rest = region;

    loop {
        rest = skip_separators(rest);
        if rest.is_empty() {
            break;
        }
        if rest.starts_with(SEGMENT_MARKER) {
            // Close out the previous block before opening the next.
            if let (Some(label), Some(block)) = (last_label, blocks.last()) {
                if block.is_empty() {
                    return Err(empty_block(channel, label));
                }
            }
            let (label, after) = parse_marker(rest)?;
            if let Some(previous) = last_label {
                if label <= previous {
                    return Err(ScopeError::SegmentLabelOutOfOrder {
                        channel: channel.to_string(),
                        previous,
                        found: label,
                    });
                }
            }
            last_label = Some(label);
            blocks.push(Vec::new());
            rest = after;
            continue;
        }
        let (value, consumed) = scan_scientific(rest)?;
        let Some(block) = blocks.last_mut() else {
            // Sample text ahead of any marker: the region is not in the
            // expected shape, so report the span rather than guess a home
            // for the value.
            return Err(ScopeError::MalformedNumber {
                span: rest.chars().take(24).collect(),
            });
        };
        block.push(value);
        rest = &rest[consumed..];
    }

    match (last_label, blocks.last()) {
        (None, _) => {
            return Err(ScopeError::NoSegmentData {
                channel: channel.to_string(),
            })
        }
        (Some(label), Some(block)) if block.is_empty() => {
            return Err(empty_block(channel, label));
        }
        _ => {}
    }

    let expected = blocks[0].len();
    for (segment, block) in blocks.iter().enumerate() {
        if block.len() != expected {
            return Err(ScopeError::InconsistentSegmentLength {
                channel: channel.to_string(),
                segment,
                expected,
                actual: block.len(),
            });
        }
    }

    debug!(
        "Channel {channel}: parsed {} segments of {expected} samples",
        blocks.len()
    );
    Ok(blocks)
}

/// Returns the text between the first quote and its closing partner.
fn quoted_region<'a>(channel: &str, body: &'a str) -> AppResult<&'a str> {
    let unterminated = || ScopeError::UnterminatedQuote {
        channel: channel.to_string(),
    };
    let open = body.find('"').ok_or_else(unterminated)?;
    let inner = &body[open + 1..];
    let close = inner.find('"').ok_or_else(unterminated)?;
    Ok(&inner[..close])
}

/// Consumes `Segment No <int>` from the front of `rest`, returning the label
/// and the remainder. The label digits may abut the `No` keyword.
fn parse_marker(rest: &str) -> AppResult<(u64, &str)> {
    let malformed = |text: &str| ScopeError::MalformedNumber {
        span: text.chars().take(24).collect(),
    };
    let after = rest[SEGMENT_MARKER.len()..].trim_start();
    let after = after.strip_prefix("No").ok_or_else(|| malformed(rest))?;
    let after = after.trim_start();

    let digits = after.len() - after.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return Err(malformed(rest));
    }
    let label = after[..digits]
        .parse::<u64>()
        .map_err(|_| malformed(rest))?;
    Ok((label, &after[digits..]))
}

fn skip_separators(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == ',')
}

fn empty_block(channel: &str, label: u64) -> ScopeError {
    ScopeError::EmptySampleBlock {
        channel: channel.to_string(),
        label,
    }
}
