// src/pixel.rs

//! Per-pixel byte codec for the supported framebuffer depths.
//!
//! The codec is selected once at startup from the device geometry and then
//! applied per pixel. Encoding and decoding are symmetric so the compositor
//! can blend against content already on screen.

use crate::color::Rgb;
use crate::error::Error;
use crate::fb::Geometry;

// Fallback channel layout for 32 bpp devices that report none.
const DEFAULT_RED_OFFSET: u32 = 16;
const DEFAULT_GREEN_OFFSET: u32 = 8;
const DEFAULT_BLUE_OFFSET: u32 = 0;

/// Byte-level codec for one pixel of the target's native format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8 bpp: a single grayscale intensity byte, no channel separation.
    Gray8,
    /// 16 bpp: packed 5-6-5 (red, green, blue) in host byte order.
    Rgb565,
    /// 32 bpp: one byte per channel at the device-reported bit offsets; the
    /// remaining byte is fixed at 255.
    Xrgb8888 {
        red_offset: u32,
        green_offset: u32,
        blue_offset: u32,
    },
}

impl PixelFormat {
    /// Selects the codec for a device geometry.
    ///
    /// Unsupported depths and channel layouts are configuration errors,
    /// rejected here so they can never surface per pixel.
    pub fn for_geometry(geometry: &Geometry) -> Result<Self, Error> {
        match geometry.bits_per_pixel {
            8 => Ok(PixelFormat::Gray8),
            16 => Ok(PixelFormat::Rgb565),
            32 => {
                let offsets = [
                    geometry.red_offset,
                    geometry.green_offset,
                    geometry.blue_offset,
                ];
                let aligned = offsets.iter().all(|o| o % 8 == 0 && *o < 32);
                let distinct = offsets[0] != offsets[1]
                    && offsets[1] != offsets[2]
                    && offsets[0] != offsets[2];
                if !aligned || !distinct {
                    return Err(Error::Config(format!(
                        "unsupported 32 bpp channel layout (red@{}, green@{}, blue@{})",
                        offsets[0], offsets[1], offsets[2]
                    )));
                }
                Ok(PixelFormat::Xrgb8888 {
                    red_offset: geometry.red_offset,
                    green_offset: geometry.green_offset,
                    blue_offset: geometry.blue_offset,
                })
            }
            other => Err(Error::Config(format!(
                "unsupported bit depth {} (supported: 8, 16, 32)",
                other
            ))),
        }
    }

    /// Bytes occupied by one encoded pixel.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb565 => 2,
            PixelFormat::Xrgb8888 { .. } => 4,
        }
    }

    /// Encodes `color` into `out`, which must hold exactly one pixel.
    pub fn encode(self, color: Rgb, out: &mut [u8]) {
        debug_assert_eq!(out.len(), self.bytes_per_pixel());
        match self {
            PixelFormat::Gray8 => {
                // Mean of the channels; exact for monochrome sources where
                // all three are equal.
                out[0] = ((color.r as u16 + color.g as u16 + color.b as u16) / 3) as u8;
            }
            PixelFormat::Rgb565 => {
                // Channels are truncated, not rounded, to 5-6-5 bits.
                let packed = ((color.r as u16 >> 3) << 11)
                    | ((color.g as u16 >> 2) << 5)
                    | (color.b as u16 >> 3);
                out.copy_from_slice(&packed.to_ne_bytes());
            }
            PixelFormat::Xrgb8888 {
                red_offset,
                green_offset,
                blue_offset,
            } => {
                let mut packed = u32::MAX;
                packed &= !(0xFFu32 << red_offset);
                packed &= !(0xFFu32 << green_offset);
                packed &= !(0xFFu32 << blue_offset);
                packed |= (color.r as u32) << red_offset;
                packed |= (color.g as u32) << green_offset;
                packed |= (color.b as u32) << blue_offset;
                out.copy_from_slice(&packed.to_ne_bytes());
            }
        }
    }

    /// Decodes one pixel back to a color.
    ///
    /// Bits lost to 5-6-5 truncation come back as zeros, bounding the
    /// round-trip error at 7 for red/blue and 3 for green.
    pub fn decode(self, bytes: &[u8]) -> Rgb {
        debug_assert_eq!(bytes.len(), self.bytes_per_pixel());
        match self {
            PixelFormat::Gray8 => Rgb::new(bytes[0], bytes[0], bytes[0]),
            PixelFormat::Rgb565 => {
                let packed = u16::from_ne_bytes([bytes[0], bytes[1]]);
                let r5 = ((packed >> 11) & 0x1F) as u8;
                let g6 = ((packed >> 5) & 0x3F) as u8;
                let b5 = (packed & 0x1F) as u8;
                Rgb::new(r5 << 3, g6 << 2, b5 << 3)
            }
            PixelFormat::Xrgb8888 {
                red_offset,
                green_offset,
                blue_offset,
            } => {
                let packed = u32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
                Rgb::new(
                    (packed >> red_offset) as u8,
                    (packed >> green_offset) as u8,
                    (packed >> blue_offset) as u8,
                )
            }
        }
    }
}

/// Substitutes the default XRGB layout when a 32 bpp device reports none.
///
/// Some drivers leave the channel bitfields zeroed; all-equal offsets are
/// taken as "not reported".
pub fn channel_offsets_or_default(red: u32, green: u32, blue: u32) -> (u32, u32, u32) {
    if red == green && green == blue {
        (
            DEFAULT_RED_OFFSET,
            DEFAULT_GREEN_OFFSET,
            DEFAULT_BLUE_OFFSET,
        )
    } else {
        (red, green, blue)
    }
}
