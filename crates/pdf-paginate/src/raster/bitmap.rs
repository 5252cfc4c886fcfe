use super::{CaptureOptions, Rasterizer, SourceRaster, apply_scale};
use crate::types::Result;
use image::DynamicImage;

/// Rasterizer for captures that already live in memory
#[derive(Debug, Clone, Copy, Default)]
pub struct BitmapRasterizer;

impl Rasterizer for BitmapRasterizer {
    type Node = DynamicImage;

    async fn capture(&self, node: &DynamicImage, options: &CaptureOptions) -> Result<SourceRaster> {
        let image = node.clone();
        let scale = options.scale;
        let scaled = tokio::task::spawn_blocking(move || apply_scale(image, scale)).await??;
        Ok(SourceRaster::new(scaled))
    }
}
