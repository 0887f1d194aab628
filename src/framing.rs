//! Status-byte response framing.
//!
//! The LC574AL's replies carry no length prefix and no end-of-message byte,
//! so message boundaries must be manufactured: every outgoing query gets
//! `;*STB?` appended, which makes the instrument tack its status-byte value
//! onto the end of the reply as a final line. That line is used purely as an
//! end-of-response sentinel; its numeric content is discarded.
//!
//! The read loop is bounded twice over, by wall clock and by a byte ceiling.
//! A reply that produces no marker within either budget fails with
//! [`ScopeError::FramingTimeout`] instead of hanging the acquisition.

use crate::adapters::ByteChannel;
use crate::error::{AppResult, ScopeError};
use log::{debug, trace};
use std::time::{Duration, Instant};

/// Token the instrument echoes back on the sentinel line of every reply.
const STATUS_MARKER: &str = "*STB";

/// Suffix appended to every query to force the sentinel line.
const STATUS_SUFFIX: &str = ";*STB?";

/// Frames queries and responses over a [`ByteChannel`].
///
/// Strictly half-duplex: one query in flight at a time, enforced by the
/// `&mut self` receivers. Each response is fully read (and the channel
/// drained) before the next query is written.
pub struct Framer<C: ByteChannel> {
    channel: C,
    read_timeout: Duration,
    max_response_bytes: usize,
}

impl<C: ByteChannel> Framer<C> {
    /// Wraps `channel` with the given read budget.
    ///
    /// `read_timeout` bounds the wall-clock wait for the sentinel line;
    /// `max_response_bytes` bounds the accumulated response size. Exceeding
    /// either aborts the query with [`ScopeError::FramingTimeout`].
    pub fn new(channel: C, read_timeout: Duration, max_response_bytes: usize) -> Self {
        Self {
            channel,
            read_timeout,
            max_response_bytes,
        }
    }

    /// Consumes the framer, returning the underlying channel.
    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Writes `command` with no status suffix and reads nothing back.
    ///
    /// For instrument commands that produce no reply, such as `DATE`.
    pub async fn send(&mut self, command: &str) -> AppResult<()> {
        debug!("Sending command: {command}");
        self.channel
            .write(format!("{command}\r\n").as_bytes())
            .await
    }

    /// Issues `command` and returns the complete response body.
    ///
    /// The command is written as `<command>;*STB?\r\n` in one unit. Incoming
    /// bytes are accumulated line by line: a line containing the status
    /// marker ends the response (only the text preceding the marker on that
    /// line is kept); every other line is kept whole, terminator included.
    /// Residual channel input is discarded before returning so the next
    /// query starts clean.
    pub async fn query(&mut self, command: &str) -> AppResult<String> {
        debug!("Issuing query: {command}");
        self.channel
            .write(format!("{command}{STATUS_SUFFIX}\r\n").as_bytes())
            .await?;

        let started = Instant::now();
        let mut response = String::new();
        let mut line = String::new();
        let mut chunk = [0u8; 4096];
        let mut bytes_read = 0usize;

        loop {
            if started.elapsed() > self.read_timeout {
                return Err(self.timeout(command, bytes_read));
            }

            let n = self.channel.read(&mut chunk).await?;
            if n == 0 {
                continue;
            }
            bytes_read += n;
            trace!("Read {n} bytes ({bytes_read} total) for query: {command}");

            for &byte in &chunk[..n] {
                line.push(byte as char);
                if byte != b'\n' {
                    continue;
                }
                if let Some(marker) = line.find(STATUS_MARKER) {
                    response.push_str(&line[..marker]);
                    self.channel.drain().await?;
                    debug!(
                        "Query '{command}' framed: {} response bytes",
                        response.len()
                    );
                    return Ok(response);
                }
                response.push_str(&line);
                line.clear();
            }

            if bytes_read > self.max_response_bytes {
                return Err(self.timeout(command, bytes_read));
            }
        }
    }

    fn timeout(&self, command: &str, bytes_read: usize) -> ScopeError {
        ScopeError::FramingTimeout {
            command: command.to_string(),
            bytes_read,
            budget: self.read_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockChannel;

    fn framer_with_reply(reply: &str) -> Framer<MockChannel> {
        let mut channel = MockChannel::new();
        channel.push_reply(reply);
        Framer::new(channel, Duration::from_millis(50), 1 << 20)
    }

    #[tokio::test]
    async fn keeps_data_lines_and_strips_the_marker_line() {
        let mut framer = framer_with_reply("line one\r\nline two\r\n*STB 0\r\n");
        let body = framer.query("C1:INSPECT? \"TRIGTIME\"").await.unwrap();
        assert_eq!(body, "line one\r\nline two\r\n");
    }

    #[tokio::test]
    async fn keeps_text_preceding_the_marker_on_its_line() {
        let mut framer = framer_with_reply("payload tail *STB 1\r\n");
        let body = framer.query("*IDN?").await.unwrap();
        assert_eq!(body, "payload tail ");
    }

    #[tokio::test]
    async fn appends_status_suffix_and_crlf_to_the_query() {
        let mut channel = MockChannel::new();
        channel.push_reply("*STB 0\r\n");
        let mut framer = Framer::new(channel, Duration::from_millis(50), 1 << 20);
        framer.query("*IDN?").await.unwrap();
        let written = framer.into_channel().written();
        assert_eq!(written, vec!["*IDN?;*STB?\r\n".to_string()]);
    }

    #[tokio::test]
    async fn send_writes_without_suffix() {
        let mut framer = Framer::new(MockChannel::new(), Duration::from_millis(50), 1 << 20);
        framer.send("DATE 26,AUG,2026,14,30,00").await.unwrap();
        let written = framer.into_channel().written();
        assert_eq!(written, vec!["DATE 26,AUG,2026,14,30,00\r\n".to_string()]);
    }

    #[tokio::test]
    async fn silent_instrument_times_out() {
        let mut framer = Framer::new(MockChannel::new(), Duration::from_millis(20), 1 << 20);
        match framer.query("*IDN?").await {
            Err(ScopeError::FramingTimeout {
                command,
                bytes_read,
                ..
            }) => {
                assert_eq!(command, "*IDN?");
                assert_eq!(bytes_read, 0);
            }
            other => panic!("expected FramingTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn markerless_reply_trips_the_byte_ceiling() {
        let mut channel = MockChannel::new();
        channel.push_reply("0123456789ABCDEF\r\n");
        let mut framer = Framer::new(channel, Duration::from_secs(5), 8);
        match framer.query("*IDN?").await {
            Err(ScopeError::FramingTimeout { bytes_read, .. }) => {
                assert!(bytes_read > 8);
            }
            other => panic!("expected FramingTimeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn residual_input_is_drained_after_the_marker() {
        let mut framer = framer_with_reply("data\r\n*STB 0\r\ntrailing garbage\r\n");
        let body = framer.query("Q?").await.unwrap();
        assert_eq!(body, "data\r\n");
        let mut channel = framer.into_channel();
        let mut buf = [0u8; 64];
        assert_eq!(channel.read(&mut buf).await.unwrap(), 0);
    }
}
