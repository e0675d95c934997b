// src/error.rs

//! Error taxonomy for the renderer.
//!
//! Variants classify failures by stage: configuration mistakes and device
//! bring-up problems are fatal before the render loop starts, sensor failures
//! are transient and recovered locally, and I/O failures on an established
//! target stop the loop.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration, rejected before the render loop starts.
    #[error("configuration error: {0}")]
    Config(String),
    /// Framebuffer device could not be opened, queried, or mapped.
    #[error("device error: {0}")]
    Device(String),
    /// Sensor source could not be read or parsed this tick.
    #[error("sensor error: {0}")]
    Sensor(String),
    /// I/O failure on an already-established target.
    ///
    /// Constructed explicitly at the failing call site; there is no blanket
    /// `From<io::Error>` into this fatal class.
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
