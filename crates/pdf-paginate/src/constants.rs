//! Shared constants for raster pagination
//!
//! This module centralizes magic numbers and constants used throughout
//! the export process.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Convert points to millimeters
#[inline]
pub fn pt_to_mm(pt: f32) -> f32 {
    pt / POINTS_PER_MM
}

// =============================================================================
// Rasterization
// =============================================================================

/// Default capture resolution multiplier
pub const DEFAULT_SCALE: u32 = 2;

/// Default JPEG quality, same as a browser canvas `toDataURL("image/jpeg")`
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// Smallest page height, in raster rows, that still makes progress
pub const MIN_PAGE_HEIGHT_PX: f64 = 1.0;

/// Page boundaries closer than this to a whole row snap onto it
pub const ROW_EPSILON: f64 = 1e-6;

// =============================================================================
// Output
// =============================================================================

/// File name used when the caller does not pick one
pub const DEFAULT_OUTPUT_FILENAME: &str = "resume.pdf";

/// Resource name of the slice image on every page
pub const SLICE_XOBJECT_NAME: &str = "Im0";

/// PDF version written to the output header
pub const PDF_VERSION: &str = "1.7";
