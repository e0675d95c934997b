// src/driver.rs

//! The frame driver: owns the render target and every pipeline component and
//! drives them at a fixed rate.
//!
//! Per tick: poll the shutdown flag, sample the sensor, fill the noise grid,
//! encode (blending against existing content when opacity is below 1) into
//! the target's rows, then sleep whatever budget the scheduler grants.

use std::time::{Duration, Instant};

use log::{debug, info};

use crate::color::Rgb;
use crate::compose::blend;
use crate::config::Config;
use crate::error::Error;
use crate::fb::{Geometry, Region, RenderTarget};
use crate::noise::NoiseSampler;
use crate::pixel::PixelFormat;
use crate::sensor::SensorReader;
use crate::signals;
use crate::timing::{Clock, MonotonicClock, TickBudget, TickScheduler};

/// Rows per second the partial-update band scrolls down the region.
const BAND_SCROLL_RATE: f64 = 10.0;
/// The band covers this fraction of the region height.
const BAND_FRACTION: u32 = 4;
/// Spacing of the per-second frame statistics at debug level.
const STATS_WINDOW: Duration = Duration::from_secs(1);

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickStatus {
    /// Keep rendering.
    Running,
    /// A shutdown signal was observed; leave the loop.
    Stopping,
}

/// Rolling frame statistics for one reporting window.
#[derive(Debug)]
struct TickStats {
    window_start: Instant,
    frames: u32,
    overruns: u32,
}

/// Owns the render pipeline and paces it at the configured rate.
pub struct FrameDriver<T: RenderTarget, C: Clock = MonotonicClock> {
    target: T,
    clock: C,
    format: PixelFormat,
    sampler: NoiseSampler,
    sensor: Option<SensorReader>,
    scheduler: TickScheduler,
    region: Region,
    opacity: f64,
    partial_update: bool,
    fps: f64,
    tick_index: u64,
    grid: Vec<Rgb>,
    stats: TickStats,
}

impl<T: RenderTarget> FrameDriver<T, MonotonicClock> {
    /// Builds a driver over `target` from a validated configuration.
    pub fn new(
        target: T,
        config: &Config,
        sampler: NoiseSampler,
        sensor: Option<SensorReader>,
    ) -> Result<Self, Error> {
        Self::with_clock(target, config, sampler, sensor, MonotonicClock)
    }
}

impl<T: RenderTarget, C: Clock> FrameDriver<T, C> {
    /// As [`FrameDriver::new`], with an explicit clock. Tests drive fake time
    /// through this.
    pub fn with_clock(
        target: T,
        config: &Config,
        sampler: NoiseSampler,
        sensor: Option<SensorReader>,
        clock: C,
    ) -> Result<Self, Error> {
        let geometry = *target.geometry();
        let format = PixelFormat::for_geometry(&geometry)?;
        let region = Self::configured_region(&geometry, config)?;
        let now = clock.now();
        Ok(FrameDriver {
            target,
            clock,
            format,
            sampler,
            sensor,
            scheduler: TickScheduler::new(config.fps, now),
            region,
            opacity: config.opacity,
            partial_update: config.partial_update,
            fps: config.fps,
            tick_index: 0,
            grid: Vec::new(),
            stats: TickStats {
                window_start: now,
                frames: 0,
                overruns: 0,
            },
        })
    }

    /// The update area: the whole screen unless a width/height override
    /// restricts it. Overrides larger than the device are configuration
    /// errors, not silently clamped.
    fn configured_region(geometry: &Geometry, config: &Config) -> Result<Region, Error> {
        match (config.width, config.height) {
            (None, None) => Ok(Region::full(geometry)),
            (width, height) => Region::new(
                0,
                0,
                width.unwrap_or(geometry.width),
                height.unwrap_or(geometry.height),
                geometry,
            ),
        }
    }

    /// The configured update region.
    pub fn region(&self) -> Region {
        self.region
    }

    /// The render target, for inspection after a run.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Mutable access to the target, for seeding content before a run.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    /// Renders until a shutdown signal arrives.
    pub fn run(&mut self) -> Result<(), Error> {
        info!(
            "FrameDriver: rendering {}x{} at ({}, {}), {} fps, opacity {}",
            self.region.width, self.region.height, self.region.x, self.region.y, self.fps,
            self.opacity
        );
        loop {
            if self.tick()? == TickStatus::Stopping {
                info!("FrameDriver: shutdown requested, leaving the render loop");
                return Ok(());
            }
        }
    }

    /// Renders at most `count` ticks, stopping early on a shutdown signal.
    pub fn run_ticks(&mut self, count: u64) -> Result<(), Error> {
        for _ in 0..count {
            if self.tick()? == TickStatus::Stopping {
                return Ok(());
            }
        }
        Ok(())
    }

    fn tick(&mut self) -> Result<TickStatus, Error> {
        if signals::shutdown_requested() {
            return Ok(TickStatus::Stopping);
        }

        let intensity = match &mut self.sensor {
            Some(sensor) => sensor.sample(),
            None => 1.0,
        };

        let region = self.tick_region();
        self.render_region(&region, intensity)?;
        self.tick_index += 1;

        let now = self.clock.now();
        let budget = self.scheduler.sleep_budget(now);
        self.note_tick(now, budget);
        self.clock.sleep(budget.sleep_duration());
        Ok(TickStatus::Running)
    }

    /// The rectangle updated this tick: the whole configured region, or a
    /// scrolling band covering a quarter of its height.
    ///
    /// The band offset is derived from the tick index rather than the wall
    /// clock, so seeded runs reproduce byte-identically.
    fn tick_region(&self) -> Region {
        if !self.partial_update {
            return self.region;
        }
        let band_height = (self.region.height / BAND_FRACTION).max(1);
        let span = self.region.height.saturating_sub(band_height).max(1);
        let scrolled = (self.tick_index as f64 * BAND_SCROLL_RATE / self.fps) as u64;
        let offset = (scrolled % span as u64) as u32;
        Region {
            x: self.region.x,
            y: self.region.y + offset,
            width: self.region.width,
            height: band_height,
        }
    }

    fn render_region(&mut self, region: &Region, intensity: f64) -> Result<(), Error> {
        let stride = self.target.geometry().stride as usize;
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let width = region.width as usize;

        self.sampler
            .sample_into(&mut self.grid, width, region.height as usize, intensity);

        // At full opacity nothing shows through, so skip the read-back.
        let blending = self.opacity < 1.0;
        let buffer = self.target.bytes_mut();
        for row in 0..region.height as usize {
            let y = region.y as usize + row;
            let row_start = y * stride + region.x as usize * bytes_per_pixel;
            let row_bytes = &mut buffer[row_start..row_start + width * bytes_per_pixel];
            let samples = &self.grid[row * width..(row + 1) * width];
            for (pixel, sample) in row_bytes.chunks_exact_mut(bytes_per_pixel).zip(samples) {
                let color = if blending {
                    blend(self.format.decode(pixel), *sample, self.opacity)
                } else {
                    *sample
                };
                self.format.encode(color, pixel);
            }
        }
        Ok(())
    }

    fn note_tick(&mut self, now: Instant, budget: TickBudget) {
        self.stats.frames += 1;
        if budget.is_overrun() {
            self.stats.overruns += 1;
        }
        let elapsed = now.duration_since(self.stats.window_start);
        if elapsed >= STATS_WINDOW {
            debug!(
                "FrameDriver: {:.1} fps over the last {:.2}s ({} overrun ticks)",
                self.stats.frames as f64 / elapsed.as_secs_f64(),
                elapsed.as_secs_f64(),
                self.stats.overruns
            );
            self.stats = TickStats {
                window_start: now,
                frames: 0,
                overruns: 0,
            };
        }
    }
}
