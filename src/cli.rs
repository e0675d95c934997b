// src/cli.rs

//! Command-line surface.
//!
//! Every value flag is optional so the configuration layer can tell an
//! explicit flag apart from a default when merging with a config file; the
//! documented defaults live in `config`.

use std::path::PathBuf;

use clap::Parser;

use crate::color::Colormap;
use crate::noise::NoiseMode;

/// Renders pseudo-random noise into a Linux framebuffer device.
#[derive(Debug, Parser)]
#[command(name = "fbnoise", version, about)]
pub struct Cli {
    /// Framebuffer device to render into [default: /dev/fb0]
    #[arg(long, value_name = "PATH")]
    pub fb: Option<PathBuf>,

    /// Width of the updated area in pixels [default: device width]
    #[arg(long)]
    pub width: Option<u32>,

    /// Height of the updated area in pixels [default: device height]
    #[arg(long)]
    pub height: Option<u32>,

    /// Blend weight of fresh noise: 0 keeps the screen, 1 replaces it [default: 0.5]
    #[arg(long, allow_negative_numbers = true)]
    pub opacity: Option<f64>,

    /// Colormap for colormap-mode noise; implies --noise-type colormap [default: gray]
    #[arg(long, value_enum)]
    pub colormap: Option<Colormap>,

    /// How pixel colors are drawn [default: rgb]
    #[arg(long, value_enum)]
    pub noise_type: Option<NoiseMode>,

    /// Target frames per second [default: 30]
    #[arg(long, allow_negative_numbers = true)]
    pub fps: Option<f64>,

    /// Seed for reproducible noise [default: drawn from entropy]
    #[arg(long)]
    pub seed: Option<u64>,

    /// File whose numeric content modulates brightness
    #[arg(long, value_name = "PATH")]
    pub input_path: Option<PathBuf>,

    /// Sensor value mapped to intensity 0 [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub min_value: Option<f64>,

    /// Sensor value mapped to intensity 1 [default: 1]
    #[arg(long, allow_negative_numbers = true)]
    pub max_value: Option<f64>,

    /// JSON config file; explicit flags override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Update a scrolling band instead of the whole area each tick
    #[arg(long)]
    pub partial_update: bool,

    /// Verbose logging plus a dump of the effective configuration
    #[arg(long)]
    pub debug: bool,
}
