//! Serial link to the Prologix GPIB-USB controller.
//!
//! The `serialport` crate is synchronous, so all port I/O runs on Tokio's
//! blocking executor. The port itself uses a short poll timeout; a poll that
//! returns nothing is surfaced as `Ok(0)` so the framer's own read budget is
//! the single source of truth for "the instrument never answered".

use super::ByteChannel;
use crate::error::AppResult;
use async_trait::async_trait;
use log::debug;
use serialport::SerialPort;
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Poll interval for a single blocking read on the port.
///
/// Deliberately much shorter than any sensible framing budget so the framer
/// gets regular chances to check its own deadline.
const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// [`ByteChannel`] over an RS-232/USB serial port.
#[derive(Clone)]
pub struct SerialChannel {
    port: Arc<Mutex<Box<dyn SerialPort>>>,
    port_name: String,
}

impl SerialChannel {
    /// Opens `port_name` at `baud_rate`.
    pub fn open(port_name: &str, baud_rate: u32) -> AppResult<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(POLL_TIMEOUT)
            .open()?;
        debug!("Serial port '{port_name}' opened at {baud_rate} baud");
        Ok(Self {
            port: Arc::new(Mutex::new(port)),
            port_name: port_name.to_string(),
        })
    }

    /// Name of the underlying port (e.g. `/dev/ttyUSB0`).
    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

#[async_trait]
impl ByteChannel for SerialChannel {
    async fn write(&mut self, bytes: &[u8]) -> AppResult<()> {
        let port = Arc::clone(&self.port);
        let bytes = bytes.to_vec();
        tokio::task::spawn_blocking(move || -> AppResult<()> {
            let mut guard = port.blocking_lock();
            guard.write_all(&bytes)?;
            guard.flush()?;
            Ok(())
        })
        .await
        .map_err(|e| std::io::Error::other(format!("serial write task panicked: {e}")))?
    }

    async fn read(&mut self, buffer: &mut [u8]) -> AppResult<usize> {
        let port = Arc::clone(&self.port);
        let capacity = buffer.len();
        let chunk = tokio::task::spawn_blocking(move || -> AppResult<Vec<u8>> {
            let mut local = vec![0u8; capacity];
            let mut guard = port.blocking_lock();
            match guard.read(&mut local) {
                Ok(n) => {
                    local.truncate(n);
                    Ok(local)
                }
                // Poll expired with nothing pending; not an error.
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(Vec::new()),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(|e| std::io::Error::other(format!("serial read task panicked: {e}")))??;

        buffer[..chunk.len()].copy_from_slice(&chunk);
        Ok(chunk.len())
    }
}
