// src/fb/mod.rs

//! Render targets: device geometry, update regions, and the byte buffers the
//! renderer writes into.
//!
//! The real memory-mapped device lives in [`device`]; [`MemoryTarget`] backs
//! tests and headless runs with a plain allocation following the same layout
//! rules.

pub mod device;

pub use device::FramebufferDevice;

use crate::error::Error;

/// Screen geometry as reported by a device (or chosen directly for a test).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    /// Visible width in pixels.
    pub width: u32,
    /// Visible height in pixels.
    pub height: u32,
    /// Depth of one pixel.
    pub bits_per_pixel: u32,
    /// Bytes per row, including any padding past the visible width.
    pub stride: u32,
    /// Bit offset of the red channel within a 32 bpp pixel.
    pub red_offset: u32,
    /// Bit offset of the green channel within a 32 bpp pixel.
    pub green_offset: u32,
    /// Bit offset of the blue channel within a 32 bpp pixel.
    pub blue_offset: u32,
}

impl Geometry {
    /// Geometry with no row padding and the common XRGB channel layout.
    pub fn packed(width: u32, height: u32, bits_per_pixel: u32) -> Self {
        Geometry {
            width,
            height,
            bits_per_pixel,
            stride: width * (bits_per_pixel / 8),
            red_offset: 16,
            green_offset: 8,
            blue_offset: 0,
        }
    }

    pub fn bytes_per_pixel(&self) -> usize {
        (self.bits_per_pixel / 8) as usize
    }

    /// Total length of the target buffer in bytes.
    pub fn buffer_len(&self) -> usize {
        self.stride as usize * self.height as usize
    }

    /// Checks internal consistency before anything is mapped or rendered.
    pub fn validate(&self) -> Result<(), Error> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::Device(format!(
                "degenerate geometry {}x{}",
                self.width, self.height
            )));
        }
        if self.bits_per_pixel == 0 || self.bits_per_pixel % 8 != 0 {
            return Err(Error::Device(format!(
                "bit depth {} is not a whole number of bytes",
                self.bits_per_pixel
            )));
        }
        let min_stride = self.width as usize * self.bytes_per_pixel();
        if (self.stride as usize) < min_stride {
            return Err(Error::Device(format!(
                "stride {} cannot hold {} pixels at {} bpp ({} bytes)",
                self.stride, self.width, self.bits_per_pixel, min_stride
            )));
        }
        Ok(())
    }
}

/// A rectangle of pixels within a target.
///
/// Constructed through [`Region::new`], which rejects rectangles reaching
/// outside the target, so a held `Region` is always safe to render into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// The full visible area of `geometry`.
    pub fn full(geometry: &Geometry) -> Self {
        Region {
            x: 0,
            y: 0,
            width: geometry.width,
            height: geometry.height,
        }
    }

    /// Creates a region, rejecting empty rectangles and anything that does
    /// not fit inside `geometry`.
    pub fn new(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        geometry: &Geometry,
    ) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::Config(format!("empty region {}x{}", width, height)));
        }
        if x as u64 + width as u64 > geometry.width as u64
            || y as u64 + height as u64 > geometry.height as u64
        {
            return Err(Error::Config(format!(
                "region {}x{} at ({}, {}) exceeds the {}x{} framebuffer",
                width, height, x, y, geometry.width, geometry.height
            )));
        }
        Ok(Region {
            x,
            y,
            width,
            height,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Byte-level access to a render surface.
///
/// The surface is `stride * height` bytes, row-major, in the device's native
/// pixel format. Implementations guarantee the slice length matches
/// [`Geometry::buffer_len`].
pub trait RenderTarget {
    fn geometry(&self) -> &Geometry;
    fn bytes(&self) -> &[u8];
    fn bytes_mut(&mut self) -> &mut [u8];
}

/// Vec-backed target with the same layout rules as a mapped device.
#[derive(Debug)]
pub struct MemoryTarget {
    geometry: Geometry,
    buffer: Vec<u8>,
}

impl MemoryTarget {
    pub fn new(geometry: Geometry) -> Result<Self, Error> {
        geometry.validate()?;
        let buffer = vec![0u8; geometry.buffer_len()];
        Ok(MemoryTarget { geometry, buffer })
    }

    /// Overwrites every byte of the surface, useful as a sentinel in tests.
    pub fn fill(&mut self, value: u8) {
        self.buffer.fill(value);
    }
}

impl RenderTarget for MemoryTarget {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn bytes(&self) -> &[u8] {
        &self.buffer
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_geometry_has_minimal_stride() {
        let geometry = Geometry::packed(640, 480, 16);
        assert_eq!(geometry.stride, 1280);
        assert_eq!(geometry.buffer_len(), 1280 * 480);
        assert!(geometry.validate().is_ok());
    }

    #[test]
    fn padded_stride_is_accepted() {
        let mut geometry = Geometry::packed(30, 10, 32);
        geometry.stride = 256; // row padding past 30 * 4 = 120 bytes
        assert!(geometry.validate().is_ok());
        assert_eq!(geometry.buffer_len(), 2560);
    }

    #[test]
    fn undersized_stride_is_rejected() {
        let mut geometry = Geometry::packed(640, 480, 32);
        geometry.stride = 640; // needs 640 * 4
        assert!(matches!(geometry.validate(), Err(Error::Device(_))));
    }

    #[test]
    fn fractional_bit_depth_is_rejected() {
        let geometry = Geometry::packed(16, 16, 12);
        assert!(matches!(geometry.validate(), Err(Error::Device(_))));
    }

    #[test]
    fn full_region_covers_the_geometry() {
        let geometry = Geometry::packed(640, 480, 16);
        let region = Region::full(&geometry);
        assert_eq!(region.pixel_count(), 640 * 480);
        assert_eq!((region.x, region.y), (0, 0));
    }

    #[test]
    fn oversized_region_is_rejected() {
        let geometry = Geometry::packed(640, 480, 16);
        assert!(matches!(
            Region::new(0, 0, 800, 600, &geometry),
            Err(Error::Config(_))
        ));
        // Fits by size but not at this offset.
        assert!(matches!(
            Region::new(100, 0, 600, 480, &geometry),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn interior_region_is_accepted() {
        let geometry = Geometry::packed(640, 480, 16);
        let region = Region::new(10, 20, 320, 240, &geometry).unwrap();
        assert_eq!(region.pixel_count(), 320 * 240);
    }

    #[test]
    fn empty_region_is_rejected() {
        let geometry = Geometry::packed(640, 480, 16);
        assert!(matches!(
            Region::new(0, 0, 0, 10, &geometry),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn memory_target_matches_geometry() {
        let geometry = Geometry::packed(32, 8, 32);
        let target = MemoryTarget::new(geometry).unwrap();
        assert_eq!(target.bytes().len(), geometry.buffer_len());
        assert!(target.bytes().iter().all(|b| *b == 0));
    }

    #[test]
    fn memory_target_fill_sets_every_byte() {
        let geometry = Geometry::packed(16, 4, 16);
        let mut target = MemoryTarget::new(geometry).unwrap();
        target.fill(0xAA);
        assert!(target.bytes().iter().all(|b| *b == 0xAA));
    }
}
