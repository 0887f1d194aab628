//! Command-line entry point.
//!
//! Wires configuration to the transport, runs one acquisition, and writes
//! the dataset. Typically run at the end of a spectroscopy scan, after the
//! STOP button has been pressed on the scope.

use anyhow::{Context, Result};
use clap::Parser;
use lecroy_daq::config::Settings;
use std::path::PathBuf;

/// Collect segmented trace data from a LeCroy LC574AL over GPIB-USB.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to the configuration file.
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Serial port of the Prologix controller (overrides config).
    #[arg(long)]
    port: Option<String>,

    /// GPIB address of the oscilloscope (overrides config).
    #[arg(long)]
    gpib_address: Option<u8>,

    /// Channels to acquire, e.g. `--channels 1,2` (overrides config).
    #[arg(long, value_delimiter = ',')]
    channels: Option<Vec<u8>>,

    /// Channel defining the shared time axes (overrides config).
    #[arg(long)]
    reference_channel: Option<u8>,

    /// Output directory for the dataset file (overrides config).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Sample name for the dataset filename (overrides config).
    #[arg(long)]
    sample: Option<String>,

    /// Experimenter initials for the dataset filename (overrides config).
    #[arg(long)]
    experimenter: Option<String>,

    /// Set the instrument's clock to the local time before acquiring.
    #[arg(long)]
    set_clock: bool,
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if let Some(port) = &cli.port {
        settings.transport.port = port.clone();
    }
    if let Some(address) = cli.gpib_address {
        settings.transport.gpib_address = address;
    }
    if let Some(channels) = &cli.channels {
        settings.acquisition.channels = channels.clone();
    }
    if let Some(reference) = cli.reference_channel {
        settings.acquisition.reference_channel = reference;
    }
    if let Some(dir) = &cli.output_dir {
        settings.output.directory = dir.clone();
    }
    if let Some(sample) = &cli.sample {
        settings.output.sample_name = sample.clone();
    }
    if let Some(experimenter) = &cli.experimenter {
        settings.output.experimenter = experimenter.clone();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut settings = Settings::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from '{}'", cli.config.display()))?;
    apply_overrides(&mut settings, &cli);
    settings.validate().context("Invalid configuration")?;

    run(settings, cli.set_clock).await
}

#[cfg(feature = "transport_serial")]
async fn run(settings: Settings, set_clock: bool) -> Result<()> {
    use lecroy_daq::adapters::{prologix, SerialChannel};
    use lecroy_daq::framing::Framer;
    use lecroy_daq::scope::Lc574al;
    use lecroy_daq::storage;
    use log::info;
    use std::time::Duration;

    let mut channel =
        SerialChannel::open(&settings.transport.port, settings.transport.baud_rate)
            .with_context(|| {
                format!("Failed to open serial port '{}'", settings.transport.port)
            })?;
    prologix::configure(&mut channel, settings.transport.gpib_address)
        .await
        .context("Failed to configure the Prologix controller")?;

    let framer = Framer::new(
        channel,
        Duration::from_millis(settings.acquisition.read_timeout_ms),
        settings.acquisition.max_response_bytes,
    );
    let mut scope = Lc574al::new(framer);

    if set_clock {
        scope.set_clock(chrono::Local::now()).await?;
    }

    let dataset = scope
        .acquire(
            &settings.acquisition.channels,
            settings.acquisition.reference_channel,
        )
        .await
        .context("Acquisition failed")?;

    let path = storage::write_dataset(
        &dataset,
        &settings.output.directory,
        &settings.output.sample_name,
        &settings.output.experimenter,
    )?;
    info!("Acquisition complete: {}", path.display());
    Ok(())
}

#[cfg(not(feature = "transport_serial"))]
async fn run(_settings: Settings, _set_clock: bool) -> Result<()> {
    Err(lecroy_daq::error::ScopeError::SerialFeatureDisabled.into())
}
