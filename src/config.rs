//! Application configuration using Figment.
//!
//! Settings are loaded from a TOML file (default `config/default.toml`) and
//! can be overridden by environment variables with the `LECROY_` prefix,
//! split on double underscores:
//!
//! ```text
//! LECROY_TRANSPORT__PORT=/dev/ttyUSB1
//! LECROY_TRANSPORT__GPIB_ADDRESS=7
//! LECROY_OUTPUT__SAMPLE_NAME=jrs0076
//! ```
//!
//! Every key has a default, so a missing or empty file still yields a
//! working configuration. [`Settings::validate`] is run as part of loading
//! and rejects values the acquisition could not act on.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration load error: {0}")]
    Load(#[from] figment::Error),
    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Top-level application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Serial link and GPIB addressing.
    #[serde(default)]
    pub transport: TransportSettings,
    /// Channel selection and read budget.
    #[serde(default)]
    pub acquisition: AcquisitionSettings,
    /// Where and under what name datasets are written.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Serial link to the Prologix controller and the instrument's bus address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportSettings {
    /// Serial port path (e.g. `/dev/ttyUSB0`, `COM3`).
    #[serde(default = "default_port")]
    pub port: String,
    /// Baud rate of the serial link.
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// GPIB address of the oscilloscope (1-30).
    #[serde(default = "default_gpib_address")]
    pub gpib_address: u8,
}

/// Which channels to read and how long to wait for the instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionSettings {
    /// Channels to acquire, in the order they appear in the dataset.
    #[serde(default = "default_channels")]
    pub channels: Vec<u8>,
    /// Channel whose descriptor and trigger times define the shared time
    /// axes. Must be one of `channels`.
    #[serde(default = "default_reference_channel")]
    pub reference_channel: u8,
    /// Wall-clock budget for one framed response, milliseconds.
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
    /// Byte ceiling for one framed response.
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

/// Dataset output location and filename fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    /// Directory datasets are written into (created if missing).
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    /// Sample name embedded in the dataset filename.
    #[serde(default = "default_sample_name")]
    pub sample_name: String,
    /// Experimenter initials embedded in the dataset filename.
    #[serde(default = "default_experimenter")]
    pub experimenter: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            baud_rate: default_baud_rate(),
            gpib_address: default_gpib_address(),
        }
    }
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            reference_channel: default_reference_channel(),
            read_timeout_ms: default_read_timeout_ms(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            sample_name: default_sample_name(),
            experimenter: default_experimenter(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            transport: TransportSettings::default(),
            acquisition: AcquisitionSettings::default(),
            output: OutputSettings::default(),
        }
    }
}

fn default_port() -> String {
    "/dev/ttyUSB0".to_string()
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_gpib_address() -> u8 {
    5
}

fn default_channels() -> Vec<u8> {
    vec![1, 2, 3, 4]
}

fn default_reference_channel() -> u8 {
    1
}

fn default_read_timeout_ms() -> u64 {
    10_000
}

fn default_max_response_bytes() -> usize {
    16 * 1024 * 1024
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("data")
}

fn default_sample_name() -> String {
    "sample".to_string()
}

fn default_experimenter() -> String {
    "anon".to_string()
}

impl Settings {
    /// Loads settings from `path` merged with `LECROY_`-prefixed environment
    /// variables, then validates.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Self = Figment::new()
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("LECROY_").split("__"))
            .extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that the settings describe an acquisition the instrument can
    /// actually perform.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.baud_rate == 0 {
            return Err(ConfigError::Validation("baud_rate must be > 0".to_string()));
        }
        if !(1..=30).contains(&self.transport.gpib_address) {
            return Err(ConfigError::Validation(format!(
                "gpib_address {} out of range (1-30)",
                self.transport.gpib_address
            )));
        }

        if self.acquisition.channels.is_empty() {
            return Err(ConfigError::Validation(
                "at least one channel must be requested".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for &channel in &self.acquisition.channels {
            if !(1..=4).contains(&channel) {
                return Err(ConfigError::Validation(format!(
                    "channel {channel} out of range (instrument inputs are 1-4)"
                )));
            }
            if !seen.insert(channel) {
                return Err(ConfigError::Validation(format!(
                    "channel {channel} requested more than once"
                )));
            }
        }
        if !self
            .acquisition
            .channels
            .contains(&self.acquisition.reference_channel)
        {
            return Err(ConfigError::Validation(format!(
                "reference_channel {} is not among the requested channels",
                self.acquisition.reference_channel
            )));
        }
        if self.acquisition.read_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "read_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.acquisition.max_response_bytes == 0 {
            return Err(ConfigError::Validation(
                "max_response_bytes must be > 0".to_string(),
            ));
        }

        if self.output.sample_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sample_name must not be empty".to_string(),
            ));
        }
        if self.output.experimenter.trim().is_empty() {
            return Err(ConfigError::Validation(
                "experimenter must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
