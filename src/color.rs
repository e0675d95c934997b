// src/color.rs

//! Defines the `Rgb` color type and the scalar-to-color transfer functions
//! (`Colormap`) used by colormap-mode noise.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// An RGB true color, each component from 0 to 255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }
}

// Number of hue sectors in the HSV hexcone model.
const HUE_SECTORS: f64 = 6.0;

/// Named transfer functions mapping a scalar intensity in [0,1] to a color.
///
/// Parsed from `gray`/`hsv`/`hot` on the command line and in config files, so
/// an unknown name is rejected before the render loop starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Linear grayscale ramp from black to white.
    #[default]
    Gray,
    /// Full hue rotation at maximum saturation and value.
    Hsv,
    /// Heat-style ramp: black over red and yellow to white.
    Hot,
}

impl Colormap {
    /// Maps an intensity to a color. Inputs outside [0,1] are clamped.
    ///
    /// This is a pure function: the same intensity always yields the same
    /// color, so samplers stay reproducible.
    pub fn map(self, intensity: f64) -> Rgb {
        let i = intensity.clamp(0.0, 1.0);
        match self {
            Colormap::Gray => {
                let level = (i * 255.0).round() as u8;
                Rgb::new(level, level, level)
            }
            Colormap::Hsv => hue_to_rgb(i),
            Colormap::Hot => {
                // Three clamped linear ramps, one third of the range each:
                // red rises first, then green, then blue.
                let r = (i * 3.0).clamp(0.0, 1.0);
                let g = (i * 3.0 - 1.0).clamp(0.0, 1.0);
                let b = (i * 3.0 - 2.0).clamp(0.0, 1.0);
                Rgb::new(
                    (r * 255.0).round() as u8,
                    (g * 255.0).round() as u8,
                    (b * 255.0).round() as u8,
                )
            }
        }
    }
}

/// Converts a hue fraction of a full rotation (saturation and value fixed at
/// 1) to RGB using the standard six-sector hexcone conversion.
fn hue_to_rgb(hue: f64) -> Rgb {
    let h = (hue * HUE_SECTORS) % HUE_SECTORS;
    let sector = h.floor() as u8;
    let f = h - h.floor();
    let q = ((1.0 - f) * 255.0).round() as u8;
    let t = (f * 255.0).round() as u8;
    match sector {
        0 => Rgb::new(255, t, 0),
        1 => Rgb::new(q, 255, 0),
        2 => Rgb::new(0, 255, t),
        3 => Rgb::new(0, q, 255),
        4 => Rgb::new(t, 0, 255),
        _ => Rgb::new(255, 0, q),
    }
}
