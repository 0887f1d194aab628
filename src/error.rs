//! Custom error types for the application.
//!
//! This module defines the primary error type, `ScopeError`, for the entire
//! acquisition pipeline. Using the `thiserror` crate, it provides a centralized
//! and consistent way to handle everything that can go wrong between the serial
//! link and the assembled dataset.
//!
//! ## Error Hierarchy
//!
//! `ScopeError` consolidates three families of failures:
//!
//! - **Transport**: `Io`, `Serial` and `FramingTimeout` cover the byte channel
//!   and the status-byte framing loop. A framing timeout means the instrument
//!   never produced its end-of-response marker within the read budget; the
//!   acquisition must be aborted rather than resumed mid-stream.
//! - **Grammar**: `MalformedNumber`, `MissingField`, `InvalidFieldValue`,
//!   `NoTriggerData`, `NoSegmentData`, `EmptySampleBlock`,
//!   `SegmentLabelOutOfOrder` and `UnterminatedQuote` report a response body
//!   that did not match its expected shape, carrying the offending span or
//!   field so the failure can be traced back to instrument output.
//! - **Cross-validation**: `InconsistentSegmentLength`,
//!   `IndivisibleSampleCount`, `SegmentCountMismatch` and
//!   `SampleLengthMismatch` fire when individually well-formed responses do
//!   not agree with each other. These are fatal for the whole acquisition;
//!   partial datasets are never produced.
//!
//! Every variant identifies the channel, segment or field that triggered it.
//! Nothing in this crate swallows an error, and retry policy is deliberately
//! left to the caller.

use std::time::Duration;
use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type AppResult<T> = std::result::Result<T, ScopeError>;

/// Everything that can fail between the serial link and the final dataset.
#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "transport_serial")]
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Serial support not enabled. Rebuild with --features transport_serial")]
    SerialFeatureDisabled,

    #[error(
        "No status marker after {bytes_read} bytes within {budget:?} for query '{command}'"
    )]
    FramingTimeout {
        command: String,
        bytes_read: usize,
        budget: Duration,
    },

    #[error("Malformed scientific-notation number at '{span}'")]
    MalformedNumber { span: String },

    #[error("Descriptor field '{0}' not found in response")]
    MissingField(&'static str),

    #[error("Descriptor field '{field}' has invalid value {value}")]
    InvalidFieldValue { field: &'static str, value: f64 },

    #[error("No parsable trigger-time lines in response")]
    NoTriggerData,

    #[error("Channel {channel}: sample response contains no segment markers")]
    NoSegmentData { channel: String },

    #[error("Channel {channel}: segment {label} contains no samples")]
    EmptySampleBlock { channel: String, label: u64 },

    #[error(
        "Channel {channel}: segment label {found} follows {previous}; labels must increase"
    )]
    SegmentLabelOutOfOrder {
        channel: String,
        previous: u64,
        found: u64,
    },

    #[error("Channel {channel}: sample response is missing its closing quote")]
    UnterminatedQuote { channel: String },

    #[error(
        "Channel {channel}: segment {segment} has {actual} samples, others have {expected}"
    )]
    InconsistentSegmentLength {
        channel: String,
        segment: usize,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Total sample count {wave_array_count} is not divisible by {segment_count} segments"
    )]
    IndivisibleSampleCount {
        wave_array_count: u64,
        segment_count: usize,
    },

    #[error("Channel {channel} reports {actual} segments, time axis has {expected}")]
    SegmentCountMismatch {
        channel: String,
        expected: usize,
        actual: usize,
    },

    #[error(
        "Channel {channel}: segment {segment} has {actual} samples, time axis has {expected}"
    )]
    SampleLengthMismatch {
        channel: String,
        segment: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Channel number {0} out of range (instrument inputs are 1-4)")]
    InvalidChannel(u8),

    #[error("Reference channel {channel} is not among the requested channels")]
    ReferenceChannelNotRequested { channel: String },
}
