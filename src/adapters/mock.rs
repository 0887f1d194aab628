//! Scripted in-memory channel for tests.
//!
//! `MockChannel` models the half-duplex request/response discipline of the
//! real instrument: each `write` consumes the next scripted reply and makes
//! it readable, so a query sequence can be exercised end to end without
//! hardware. An exhausted script yields `Ok(0)` on every read, which is how
//! a silent (hung) instrument looks to the framer.

use super::ByteChannel;
use crate::error::AppResult;
use async_trait::async_trait;
use std::collections::VecDeque;

/// In-memory [`ByteChannel`] with scripted replies and recorded writes.
#[derive(Debug, Default)]
pub struct MockChannel {
    script: VecDeque<Vec<u8>>,
    readable: Vec<u8>,
    read_pos: usize,
    writes: Vec<Vec<u8>>,
}

impl MockChannel {
    /// Creates a channel with an empty script (all reads return `Ok(0)`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `reply` to become readable after the next unconsumed write.
    pub fn push_reply(&mut self, reply: &str) {
        self.script.push_back(reply.as_bytes().to_vec());
    }

    /// Everything written so far, one entry per `write` call, lossily decoded.
    pub fn written(&self) -> Vec<String> {
        self.writes
            .iter()
            .map(|w| String::from_utf8_lossy(w).into_owned())
            .collect()
    }
}

#[async_trait]
impl ByteChannel for MockChannel {
    async fn write(&mut self, bytes: &[u8]) -> AppResult<()> {
        self.writes.push(bytes.to_vec());
        // One reply per request: the next scripted reply replaces whatever
        // the previous response left unread.
        if let Some(reply) = self.script.pop_front() {
            self.readable = reply;
            self.read_pos = 0;
        }
        Ok(())
    }

    async fn read(&mut self, buffer: &mut [u8]) -> AppResult<usize> {
        let pending = &self.readable[self.read_pos..];
        if pending.is_empty() {
            return Ok(0);
        }
        let n = pending.len().min(buffer.len());
        buffer[..n].copy_from_slice(&pending[..n]);
        self.read_pos += n;
        Ok(n)
    }
}
