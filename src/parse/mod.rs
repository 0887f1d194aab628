//! Response-body parsers.
//!
//! One module per `INSPECT?` body format the acquisition touches, all built
//! on the shared scientific-notation scanner in [`number`]:
//!
//! - [`descriptor`] — `"WAVEDESC"` named-field blocks
//! - [`trigtime`] — `"TRIGTIME"` paired time/offset lines
//! - [`segments`] — `"SIMPLE"` quoted segmented-sample blocks
//!
//! Parsers are pure functions of the response text: re-parsing identical
//! input always yields identical output.

pub mod descriptor;
pub mod number;
pub mod segments;
pub mod trigtime;

pub use descriptor::{parse_descriptor, Descriptor};
pub use number::scan_scientific;
pub use segments::parse_segments;
pub use trigtime::parse_trigger_times;
