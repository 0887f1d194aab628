//! Segmented trace acquisition from the LeCroy LC574AL oscilloscope.
//!
//! The instrument speaks a text query protocol over GPIB, reached here
//! through a Prologix GPIB-USB controller on a serial port. Replies carry no
//! explicit message boundary, so the framer appends `;*STB?` to every query
//! and uses the instrument's status-byte line as an end-of-response
//! sentinel. Three response-body formats are parsed into a typed,
//! per-segment dataset: the `WAVEDESC` descriptor, the `TRIGTIME` trigger
//! list, and the `SIMPLE` segmented samples.
//!
//! Pipeline: [`framing::Framer`] over a [`adapters::ByteChannel`] produces
//! response text; the [`parse`] modules produce typed values;
//! [`trace::build_time_axes`] and [`trace::assemble`] cross-validate them
//! into a [`trace::TraceDataset`]; [`storage`] writes the result. The
//! [`scope::Lc574al`] client ties the sequence together.

pub mod adapters;
pub mod config;
pub mod error;
pub mod framing;
pub mod parse;
pub mod scope;
pub mod storage;
pub mod trace;
