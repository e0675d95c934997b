// src/sensor.rs

//! External sensor input: a numeric text file rescaled into [0,1] and used as
//! a global brightness modulator.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{info, warn};

use crate::error::Error;
use crate::timing::{Clock, MonotonicClock};

/// Modulation applied when no sensor is configured or readable.
const NEUTRAL_INTENSITY: f64 = 1.0;
/// Minimum spacing between repeated read-failure warnings.
const WARN_INTERVAL: Duration = Duration::from_secs(5);

/// Reads a numeric value from a file and rescales it linearly into [0,1].
///
/// A reader never stops the render loop: failures fall back to the last
/// known-good sample and are logged at a bounded rate.
#[derive(Debug)]
pub struct SensorReader<C: Clock = MonotonicClock> {
    path: PathBuf,
    min_value: f64,
    max_value: f64,
    clock: C,
    last_sample: f64,
    failing: bool,
    last_warning: Option<Instant>,
}

impl SensorReader<MonotonicClock> {
    /// Creates a reader. Bounds must be finite with `min_value` strictly
    /// below `max_value`.
    pub fn new(path: PathBuf, min_value: f64, max_value: f64) -> Result<Self, Error> {
        Self::with_clock(path, min_value, max_value, MonotonicClock)
    }
}

impl<C: Clock> SensorReader<C> {
    /// As [`SensorReader::new`], with an explicit clock. Tests drive fake
    /// time through this.
    pub fn with_clock(
        path: PathBuf,
        min_value: f64,
        max_value: f64,
        clock: C,
    ) -> Result<Self, Error> {
        if !min_value.is_finite() || !max_value.is_finite() || min_value >= max_value {
            return Err(Error::Config(format!(
                "min-value must be strictly below max-value (got {} and {})",
                min_value, max_value
            )));
        }
        Ok(SensorReader {
            path,
            min_value,
            max_value,
            clock,
            last_sample: NEUTRAL_INTENSITY,
            failing: false,
            last_warning: None,
        })
    }

    /// Returns the current intensity in [0,1].
    ///
    /// On a read or parse failure the previous valid sample (or the neutral
    /// 1.0) is reused; the failure is logged at most once per warning
    /// interval, and recovery is logged once at info.
    pub fn sample(&mut self) -> f64 {
        match self.read_value() {
            Ok(value) => {
                if self.failing {
                    info!("sensor {} is readable again", self.path.display());
                    self.failing = false;
                    self.last_warning = None;
                }
                let span = self.max_value - self.min_value;
                self.last_sample = ((value - self.min_value) / span).clamp(0.0, 1.0);
                self.last_sample
            }
            Err(err) => {
                self.failing = true;
                let now = self.clock.now();
                let due = self
                    .last_warning
                    .map_or(true, |at| now.duration_since(at) >= WARN_INTERVAL);
                if due {
                    warn!("{}; keeping previous sample {:.3}", err, self.last_sample);
                    self.last_warning = Some(now);
                }
                self.last_sample
            }
        }
    }

    fn read_value(&self) -> Result<f64, Error> {
        let text = fs::read_to_string(&self.path)
            .map_err(|e| Error::Sensor(format!("failed to read {}: {}", self.path.display(), e)))?;
        let value: f64 = text.trim().parse().map_err(|e| {
            Error::Sensor(format!(
                "failed to parse {} as a number: {}",
                self.path.display(),
                e
            ))
        })?;
        // "nan" and "inf" parse as f64, and clamp cannot repair NaN.
        if !value.is_finite() {
            return Err(Error::Sensor(format!(
                "non-finite sensor value {} in {}",
                value,
                self.path.display()
            )));
        }
        Ok(value)
    }
}
