use crate::constants::DEFAULT_SCALE;
use crate::raster::CaptureOptions;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Export configuration
///
/// A snapshot of everything an export needs. It is cloned into the export
/// call so later edits by the caller never affect a running export.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportOptions {
    // Page geometry
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margin_mm: f32,

    // Capture
    pub scale: u32,
    pub allow_cross_origin: bool,

    // Output
    pub encoding: ImageEncoding,
    pub title: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margin_mm: 0.0,
            scale: DEFAULT_SCALE,
            allow_cross_origin: true,
            encoding: ImageEncoding::default(),
            title: None,
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ExportError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ExportError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ExportError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| ExportError::Persistence {
                path: path.to_owned(),
                source,
            })?;
        Ok(())
    }

    /// Page geometry with orientation and margins applied
    pub fn geometry(&self) -> PageGeometry {
        let (width_mm, height_mm) = self.paper_size.dimensions_with_orientation(self.orientation);
        PageGeometry::new(width_mm, height_mm).with_margin(self.margin_mm)
    }

    /// Options handed to the rasterizer
    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            scale: self.scale,
            allow_cross_origin: self.allow_cross_origin,
        }
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        self.geometry().validate()?;

        if self.scale == 0 {
            return Err(ExportError::Config(
                "Scale must be at least 1".to_string(),
            ));
        }

        if let ImageEncoding::Jpeg { quality } = self.encoding {
            if !(1..=100).contains(&quality) {
                return Err(ExportError::Config(format!(
                    "JPEG quality must be between 1 and 100, got {}",
                    quality
                )));
            }
        }

        Ok(())
    }
}
