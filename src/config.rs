// src/config.rs

//! Runtime configuration: built-in defaults, an optional JSON config file,
//! and command-line overrides, merged into one validated snapshot.
//!
//! Precedence, weakest first: defaults, then config-file values, then
//! explicit flags. The snapshot is built once at startup and read-only
//! afterwards; components receive the values they need by ownership rather
//! than through a process-wide singleton.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::color::Colormap;
use crate::error::Error;
use crate::noise::NoiseMode;

// --- Built-in defaults ---

const DEFAULT_DEVICE: &str = "/dev/fb0";
const DEFAULT_OPACITY: f64 = 0.5;
const DEFAULT_FPS: f64 = 30.0;
const DEFAULT_MIN_VALUE: f64 = 0.0;
const DEFAULT_MAX_VALUE: f64 = 1.0;

/// Complete configuration snapshot for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Framebuffer device path.
    pub device: PathBuf,
    /// Width of the updated area; `None` means the full device width.
    pub width: Option<u32>,
    /// Height of the updated area; `None` means the full device height.
    pub height: Option<u32>,
    /// Blend weight of fresh noise in [0,1].
    pub opacity: f64,
    /// How pixel colors are drawn from the random stream.
    pub noise_type: NoiseMode,
    /// Transfer function used by `colormap` mode.
    pub colormap: Colormap,
    /// Target frame rate in ticks per second.
    pub fps: f64,
    /// Seed for reproducible noise; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// File whose numeric content modulates global intensity.
    pub input_path: Option<PathBuf>,
    /// Sensor value mapped to intensity 0.
    pub min_value: f64,
    /// Sensor value mapped to intensity 1.
    pub max_value: f64,
    /// Update a scrolling band instead of the whole area each tick.
    pub partial_update: bool,
    /// Verbose logging plus a dump of the effective configuration.
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            device: PathBuf::from(DEFAULT_DEVICE),
            width: None,
            height: None,
            opacity: DEFAULT_OPACITY,
            noise_type: NoiseMode::Rgb,
            colormap: Colormap::Gray,
            fps: DEFAULT_FPS,
            seed: None,
            input_path: None,
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
            partial_update: false,
            debug: false,
        }
    }
}

impl Config {
    /// Builds the effective configuration from a parsed command line.
    pub fn resolve(cli: &Cli) -> Result<Self, Error> {
        let mut config = match &cli.config {
            Some(path) => Self::load_file(path)?,
            None => Config::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Loads a JSON snapshot; missing fields keep their defaults.
    fn load_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            Error::Config(format!(
                "failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Lays explicit flags over the current values.
    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(device) = &cli.fb {
            self.device = device.clone();
        }
        if let Some(width) = cli.width {
            self.width = Some(width);
        }
        if let Some(height) = cli.height {
            self.height = Some(height);
        }
        if let Some(opacity) = cli.opacity {
            self.opacity = opacity;
        }
        // A bare --colormap implies colormap mode; an explicit --noise-type
        // always wins.
        match (cli.noise_type, cli.colormap) {
            (Some(mode), Some(map)) => {
                self.noise_type = mode;
                self.colormap = map;
            }
            (Some(mode), None) => self.noise_type = mode,
            (None, Some(map)) => {
                self.noise_type = NoiseMode::Colormap;
                self.colormap = map;
            }
            (None, None) => {}
        }
        if let Some(fps) = cli.fps {
            self.fps = fps;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if let Some(input_path) = &cli.input_path {
            self.input_path = Some(input_path.clone());
        }
        if let Some(min_value) = cli.min_value {
            self.min_value = min_value;
        }
        if let Some(max_value) = cli.max_value {
            self.max_value = max_value;
        }
        if cli.partial_update {
            self.partial_update = true;
        }
        if cli.debug {
            self.debug = true;
        }
    }

    /// Rejects invalid combinations before any device is touched.
    fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(Error::Config(format!(
                "opacity must lie in [0, 1] (got {})",
                self.opacity
            )));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(Error::Config(format!(
                "fps must be positive (got {})",
                self.fps
            )));
        }
        if !self.min_value.is_finite()
            || !self.max_value.is_finite()
            || self.min_value >= self.max_value
        {
            return Err(Error::Config(format!(
                "min-value must be strictly below max-value (got {} and {})",
                self.min_value, self.max_value
            )));
        }
        if self.width == Some(0) || self.height == Some(0) {
            return Err(Error::Config(
                "width and height must be nonzero".to_string(),
            ));
        }
        Ok(())
    }
}
