//! LeCroy LC574AL client.
//!
//! Wraps a [`Framer`] with the instrument's query vocabulary and the
//! acquisition sequence: identity, descriptor and trigger times from one
//! reference channel, then the segmented samples of every requested channel.
//!
//! The queries are strictly sequential. The GPIB link is half-duplex and the
//! instrument does not tolerate pipelining, so each response is fully framed
//! before the next query goes out.

use crate::adapters::ByteChannel;
use crate::error::{AppResult, ScopeError};
use crate::framing::Framer;
use crate::parse::{parse_descriptor, parse_segments, parse_trigger_times, Descriptor};
use crate::trace::{assemble, build_time_axes, TraceDataset};
use chrono::{DateTime, Local};
use log::info;

/// Number of input channels on the instrument's front panel.
const CHANNEL_COUNT: u8 = 4;

/// Client for one exclusively-owned LC574AL.
pub struct Lc574al<C: ByteChannel> {
    framer: Framer<C>,
}

impl<C: ByteChannel> Lc574al<C> {
    /// Wraps an already-configured framer.
    pub fn new(framer: Framer<C>) -> Self {
        Self { framer }
    }

    /// Queries `*IDN?` and returns the trimmed identity string.
    pub async fn identify(&mut self) -> AppResult<String> {
        let body = self.framer.query("*IDN?").await?;
        Ok(body.trim().to_string())
    }

    /// Queries and parses channel `n`'s `WAVEDESC` descriptor.
    pub async fn descriptor(&mut self, channel: u8) -> AppResult<Descriptor> {
        validate_channel(channel)?;
        let body = self
            .framer
            .query(&format!("C{channel}:INSPECT? \"WAVEDESC\""))
            .await?;
        parse_descriptor(&body)
    }

    /// Queries and parses channel `n`'s absolute segment trigger times.
    pub async fn trigger_times(&mut self, channel: u8) -> AppResult<Vec<f64>> {
        validate_channel(channel)?;
        let body = self
            .framer
            .query(&format!("C{channel}:INSPECT? \"TRIGTIME\""))
            .await?;
        parse_trigger_times(&body)
    }

    /// Queries and parses channel `n`'s per-segment sample arrays.
    pub async fn segment_samples(&mut self, channel: u8) -> AppResult<Vec<Vec<f64>>> {
        validate_channel(channel)?;
        let body = self
            .framer
            .query(&format!("C{channel}:INSPECT? \"SIMPLE\""))
            .await?;
        parse_segments(&channel_id(channel), &body)
    }

    /// Sets the instrument's clock to `now`. The `DATE` command produces no
    /// reply, so this is a bare send.
    pub async fn set_clock(&mut self, now: DateTime<Local>) -> AppResult<()> {
        let command = format_date_command(now);
        info!("Setting instrument clock: {command}");
        self.framer.send(&command).await
    }

    /// Runs the full acquisition for `channels`, in request order.
    ///
    /// The shared time axes come from `reference`'s descriptor and trigger
    /// times; interval and sample count are instrument-wide settings for one
    /// acquisition, so any channel works, but the reference must be one of
    /// the requested channels so no unrequested channel is touched.
    pub async fn acquire(&mut self, channels: &[u8], reference: u8) -> AppResult<TraceDataset> {
        for &channel in channels {
            validate_channel(channel)?;
        }
        validate_channel(reference)?;
        if !channels.contains(&reference) {
            return Err(ScopeError::ReferenceChannelNotRequested {
                channel: channel_id(reference),
            });
        }

        let identity = self.identify().await?;
        info!("Acquiring from '{identity}', channels {channels:?}, reference C{reference}");

        let descriptor = self.descriptor(reference).await?;
        let trigger_times = self.trigger_times(reference).await?;
        info!(
            "Reference C{reference}: {} segments, {} samples total, {:.3e} s interval",
            trigger_times.len(),
            descriptor.wave_array_count,
            descriptor.horiz_interval
        );
        let time_axes = build_time_axes(&descriptor, &trigger_times)?;

        let mut per_channel = Vec::with_capacity(channels.len());
        for &channel in channels {
            let samples = self.segment_samples(channel).await?;
            info!("Channel C{channel}: {} segments read", samples.len());
            per_channel.push((channel_id(channel), samples));
        }

        assemble(identity, time_axes, per_channel)
    }
}

/// Formats the LC574AL `DATE` command for `now`, e.g.
/// `DATE 26,AUG,2026,14,30,00`.
fn format_date_command(now: DateTime<Local>) -> String {
    format!("DATE {}", now.format("%d,%b,%Y,%H,%M,%S")).to_uppercase()
}

fn channel_id(channel: u8) -> String {
    format!("C{channel}")
}

fn validate_channel(channel: u8) -> AppResult<()> {
    if (1..=CHANNEL_COUNT).contains(&channel) {
        Ok(())
    } else {
        Err(ScopeError::InvalidChannel(channel))
    }
}
