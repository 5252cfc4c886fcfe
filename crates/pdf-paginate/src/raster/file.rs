//! Rasterizer backed by a captured bitmap on disk

use super::{CaptureOptions, Rasterizer, SourceRaster, apply_scale};
use crate::types::*;
use image::GenericImageView;
use std::path::{Path, PathBuf};

/// Loads a previously captured bitmap (PNG, JPEG, ...) as the source raster.
///
/// With an asset root set, nodes that resolve outside of it are refused
/// unless the capture allows cross-origin resources.
#[derive(Debug, Clone, Default)]
pub struct ImageFileRasterizer {
    root: Option<PathBuf>,
}

impl ImageFileRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    async fn check_origin(&self, node: &Path) -> Result<()> {
        let Some(root) = &self.root else {
            return Ok(());
        };

        let root = tokio::fs::canonicalize(root).await.map_err(|e| {
            ExportError::Rasterization(format!("Asset root {}: {}", root.display(), e))
        })?;
        let resolved = tokio::fs::canonicalize(node).await.map_err(|e| {
            ExportError::Rasterization(format!("Capture {} not found: {}", node.display(), e))
        })?;

        if resolved.starts_with(&root) {
            Ok(())
        } else {
            Err(ExportError::Rasterization(format!(
                "{} is outside {} and cross-origin captures are disabled",
                resolved.display(),
                root.display()
            )))
        }
    }
}

impl Rasterizer for ImageFileRasterizer {
    type Node = Path;

    async fn capture(&self, node: &Path, options: &CaptureOptions) -> Result<SourceRaster> {
        if !options.allow_cross_origin {
            self.check_origin(node).await?;
        }

        let bytes = tokio::fs::read(node).await.map_err(|e| {
            ExportError::Rasterization(format!("Failed to read {}: {}", node.display(), e))
        })?;

        // Decoding is CPU-bound, spawn blocking
        let scale = options.scale;
        let image = tokio::task::spawn_blocking(move || {
            let image = image::load_from_memory(&bytes)
                .map_err(|e| ExportError::Rasterization(format!("Failed to decode capture: {}", e)))?;
            apply_scale(image, scale)
        })
        .await??;

        let (width, height) = image.dimensions();
        log::debug!(
            "Captured {} at scale {}: {}x{} px",
            node.display(),
            scale,
            width,
            height
        );

        Ok(SourceRaster::new(image))
    }
}
