//! Rasterization collaborators
//!
//! A rasterizer turns some visual node into a single tall bitmap, once per
//! export. What a "node" is depends on the implementation:
//! - `ImageFileRasterizer`: a path to an already captured bitmap on disk
//! - `BitmapRasterizer`: an in-memory image handed over by another component

mod bitmap;
mod file;

pub use bitmap::BitmapRasterizer;
pub use file::ImageFileRasterizer;

use crate::types::*;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, Rgb, RgbImage, RgbaImage};
use std::future::Future;

/// Options passed to a rasterizer for one capture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureOptions {
    /// Output resolution multiplier (>= 1)
    pub scale: u32,
    /// Whether the capture may pull in resources from outside its origin
    pub allow_cross_origin: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            scale: crate::constants::DEFAULT_SCALE,
            allow_cross_origin: true,
        }
    }
}

/// Produces the source raster for an export.
pub trait Rasterizer: Send + Sync {
    type Node: ?Sized + Sync;

    /// Capture `node` into a single bitmap at `options.scale` resolution.
    ///
    /// Failures are reported as `ExportError::Rasterization`.
    fn capture(
        &self,
        node: &Self::Node,
        options: &CaptureOptions,
    ) -> impl Future<Output = Result<SourceRaster>> + Send;
}

/// Immutable bitmap captured for one export
#[derive(Debug, Clone)]
pub struct SourceRaster {
    image: DynamicImage,
}

impl SourceRaster {
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Build a raster from raw RGBA8 pixel data (row-major, 4 bytes per pixel)
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(ExportError::Rasterization(format!(
                "Pixel buffer holds {} bytes, expected {} for {}x{} RGBA",
                pixels.len(),
                expected,
                width,
                height
            )));
        }
        let image = RgbaImage::from_raw(width, height, pixels).ok_or_else(|| {
            ExportError::Rasterization("Pixel buffer does not match dimensions".to_string())
        })?;
        Ok(Self::new(DynamicImage::ImageRgba8(image)))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Copy the rows `[y, y + height)` as opaque RGB.
    ///
    /// Transparent pixels are composited onto white.
    pub fn band_rgb(&self, y: u32, height: u32) -> RgbImage {
        let band = self.image.crop_imm(0, y, self.width(), height);
        if band.color().has_alpha() {
            flatten_onto_white(&band.to_rgba8())
        } else {
            band.to_rgb8()
        }
    }
}

/// Composite an RGBA image over an opaque white background
pub(crate) fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| -> u8 {
            let c = c as u32;
            let a = a as u32;
            ((c * a + 255 * (255 - a) + 127) / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Upscale a capture by an integer factor; `scale == 1` is a no-op
pub(crate) fn apply_scale(image: DynamicImage, scale: u32) -> Result<DynamicImage> {
    if scale == 0 {
        return Err(ExportError::Rasterization(
            "Capture scale must be at least 1".to_string(),
        ));
    }
    if scale == 1 {
        return Ok(image);
    }

    let (width, height) = image.dimensions();
    let scaled_width = width.checked_mul(scale);
    let scaled_height = height.checked_mul(scale);
    match (scaled_width, scaled_height) {
        (Some(w), Some(h)) => Ok(image.resize_exact(w, h, FilterType::Nearest)),
        _ => Err(ExportError::Rasterization(format!(
            "{}x{} capture at scale {} overflows",
            width, height, scale
        ))),
    }
}
