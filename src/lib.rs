// src/lib.rs

//! fbnoise library crate.
//!
//! This exposes the internal modules for testing and library usage.

pub mod cli;
pub mod color;
pub mod compose;
pub mod config;
pub mod driver;
pub mod error;
pub mod fb;
pub mod noise;
pub mod pixel;
pub mod sensor;
pub mod signals;
pub mod timing;
