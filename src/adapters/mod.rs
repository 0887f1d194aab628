//! Transport adapters
//!
//! This module defines the [`ByteChannel`] capability trait, the low-level
//! I/O abstraction the response framer is built on, together with its
//! implementations: a real serial link to the Prologix GPIB-USB controller
//! and a scripted mock for tests.
//!
//! The trait is deliberately byte-oriented. Message boundaries on this
//! instrument are not a transport concept; they are inferred from the
//! status-byte marker by [`crate::framing::Framer`], so the channel only
//! needs to move bytes and report "nothing arrived in this poll" as `Ok(0)`.

use crate::error::AppResult;
use async_trait::async_trait;

pub mod mock;
pub mod prologix;
#[cfg(feature = "transport_serial")]
pub mod serial;

pub use mock::MockChannel;
#[cfg(feature = "transport_serial")]
pub use serial::SerialChannel;

/// Duplex byte-stream capability over which queries are framed.
///
/// Exactly one request is in flight at a time (the GPIB link is half-duplex),
/// which the `&mut self` receivers enforce at compile time.
#[async_trait]
pub trait ByteChannel: Send {
    /// Writes `bytes` to the channel as one unit.
    async fn write(&mut self, bytes: &[u8]) -> AppResult<()>;

    /// Reads available bytes into `buffer`.
    ///
    /// Returns the number of bytes placed in `buffer`. `Ok(0)` means no data
    /// arrived within the channel's internal poll interval, not end of
    /// stream; callers decide how long to keep polling.
    async fn read(&mut self, buffer: &mut [u8]) -> AppResult<usize>;

    /// Discards any residual buffered input.
    ///
    /// Called after a complete response has been framed so the next query
    /// starts from a clean state instead of reading a stale partial frame.
    async fn drain(&mut self) -> AppResult<()> {
        let mut scratch = [0u8; 256];
        while self.read(&mut scratch).await? > 0 {}
        Ok(())
    }
}
