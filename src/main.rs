// src/main.rs

//! Main entry point for `fbnoise`: logging setup, configuration, device
//! bring-up, and the render loop.

use anyhow::Context;
use clap::Parser;
use log::info;

use fbnoise::cli::Cli;
use fbnoise::config::Config;
use fbnoise::driver::FrameDriver;
use fbnoise::fb::FramebufferDevice;
use fbnoise::noise::{NoiseSampler, RandomStream};
use fbnoise::sensor::SensorReader;
use fbnoise::signals;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize the logger. Default filter is "info" ("debug" with --debug)
    // if RUST_LOG is not set.
    let default_filter = if cli.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_micros()
        .init();

    info!("Starting fbnoise...");

    let config = Config::resolve(&cli).context("Failed to resolve configuration")?;
    if config.debug {
        let dump =
            serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
        eprintln!("{}", dump);
    }

    signals::install().context("Failed to install signal handlers")?;

    let device = FramebufferDevice::open(&config.device)
        .with_context(|| format!("Failed to open framebuffer {}", config.device.display()))?;

    let stream = RandomStream::new(config.seed);
    let sampler = NoiseSampler::new(config.noise_type, config.colormap, stream);
    let sensor = config
        .input_path
        .as_ref()
        .map(|path| SensorReader::new(path.clone(), config.min_value, config.max_value))
        .transpose()
        .context("Failed to configure sensor input")?;
    if let Some(path) = &config.input_path {
        info!("Sensor input: {}", path.display());
    }

    let mut driver = FrameDriver::new(device, &config, sampler, sensor)
        .context("Failed to initialize frame driver")?;
    driver.run().context("Render loop failed")?;

    info!("fbnoise exited successfully.");
    Ok(())
}
