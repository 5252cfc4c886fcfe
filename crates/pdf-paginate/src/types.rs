use crate::constants::DEFAULT_JPEG_QUALITY;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Rasterization failed: {0}")]
    Rasterization(String),
    #[error("Content is empty ({width}x{height} pixels)")]
    EmptyContent { width: u32, height: u32 },
    #[error("Failed to save {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Portrait: height > width (default for most paper sizes)
    #[default]
    Portrait,
    /// Landscape: width > height
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// How each page slice is stored inside the PDF
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImageEncoding {
    /// Baseline JPEG (DCTDecode), quality 1..=100
    Jpeg { quality: u8 },
    /// Raw RGB samples, Flate-compressed when the document is saved
    Lossless,
}

impl Default for ImageEncoding {
    fn default() -> Self {
        ImageEncoding::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Physical page size used for one export, in millimeters.
///
/// The printable content box is the page minus `margin_mm` on every side.
/// Raster width is always mapped onto the full content width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width_mm: f32,
    pub height_mm: f32,
    pub margin_mm: f32,
}

impl PageGeometry {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        Self {
            width_mm,
            height_mm,
            margin_mm: 0.0,
        }
    }

    pub fn with_margin(mut self, margin_mm: f32) -> Self {
        self.margin_mm = margin_mm;
        self
    }

    pub fn content_width_mm(&self) -> f32 {
        self.width_mm - 2.0 * self.margin_mm
    }

    pub fn content_height_mm(&self) -> f32 {
        self.height_mm - 2.0 * self.margin_mm
    }

    /// Check that the page and its content box have a positive area
    pub fn validate(&self) -> Result<()> {
        if !(self.width_mm > 0.0 && self.height_mm > 0.0) {
            return Err(ExportError::Config(format!(
                "Page size must be positive, got {}x{} mm",
                self.width_mm, self.height_mm
            )));
        }
        if !(self.margin_mm >= 0.0) {
            return Err(ExportError::Config(format!(
                "Margin must not be negative, got {} mm",
                self.margin_mm
            )));
        }
        if self.content_width_mm() <= 0.0 || self.content_height_mm() <= 0.0 {
            return Err(ExportError::Config(format!(
                "Margin of {} mm leaves no content area on a {}x{} mm page",
                self.margin_mm, self.width_mm, self.height_mm
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        let (width_mm, height_mm) = PaperSize::A4.dimensions_mm();
        Self::new(width_mm, height_mm)
    }
}

/// Statistics about an export, computed without rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ExportStatistics {
    /// Captured raster width in pixels
    pub raster_width: u32,
    /// Captured raster height in pixels
    pub raster_height: u32,
    /// Millimeters per raster pixel
    pub scale_factor: f64,
    /// Height of one page expressed in raster rows
    pub page_height_px: f64,
    /// Number of output pages
    pub page_count: usize,
    /// Raster rows embedded on the final page
    pub last_page_rows: u32,
}
