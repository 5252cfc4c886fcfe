//! Slice planning
//!
//! Maps a raster of `W x H` pixels onto fixed-size pages. The raster width is
//! fit to the page content width, which fixes how many raster rows one page
//! holds. The raster is then cut into horizontal bands of that height.

use crate::constants::{MIN_PAGE_HEIGHT_PX, ROW_EPSILON};
use crate::types::*;

/// The part of the raster that lands on one page.
///
/// A page shows the fractional rows `[start, end)`. Since bitmaps only hold
/// whole rows, the page embeds the band `[y, y + height)` that covers them and
/// clips away the partial rows at either edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    /// Output page index (0-based)
    pub index: usize,
    /// First embedded raster row
    pub y: u32,
    /// Number of embedded raster rows
    pub height: u32,
    /// Raster row where the page begins
    pub start: f64,
    /// Raster row where the page ends
    pub end: f64,
}

impl PageSlice {
    /// One past the last embedded raster row
    pub fn band_end(&self) -> u32 {
        self.y + self.height
    }

    /// Raster rows visible on the page
    pub fn rows(&self) -> f64 {
        self.end - self.start
    }

    /// Rows of the embedded band that sit above the page's top edge
    pub fn offset_rows(&self) -> f64 {
        self.start - self.y as f64
    }
}

/// Result of planning an export: the scale mapping and the ordered slices
#[derive(Debug, Clone, PartialEq)]
pub struct SlicePlan {
    pub raster_width: u32,
    pub raster_height: u32,
    /// Millimeters per raster pixel
    pub scale_factor: f64,
    /// Page content height expressed in raster rows (usually fractional)
    pub page_height_px: f64,
    pub slices: Vec<PageSlice>,
}

impl SlicePlan {
    pub fn page_count(&self) -> usize {
        self.slices.len()
    }

    /// Visible height of a slice on its page. Never exceeds the content height.
    pub fn slice_height_mm(&self, slice: &PageSlice) -> f64 {
        slice.rows() * self.scale_factor
    }

    /// Height of the embedded band, including the rows clipped at its edges
    pub fn band_height_mm(&self, slice: &PageSlice) -> f64 {
        slice.height as f64 * self.scale_factor
    }

    pub fn statistics(&self) -> ExportStatistics {
        ExportStatistics {
            raster_width: self.raster_width,
            raster_height: self.raster_height,
            scale_factor: self.scale_factor,
            page_height_px: self.page_height_px,
            page_count: self.page_count(),
            last_page_rows: self.slices.last().map(|slice| slice.height).unwrap_or(0),
        }
    }
}

/// Plan the slices for a raster of `width x height` pixels.
///
/// Page `k` shows rows `[k * p, min((k + 1) * p, height))` where `p` is the
/// page height in raster rows, giving `ceil(height / p)` pages. Every page but
/// the last shows exactly `p` rows.
pub fn plan_slices(width: u32, height: u32, geometry: &PageGeometry) -> Result<SlicePlan> {
    if width == 0 || height == 0 {
        return Err(ExportError::EmptyContent { width, height });
    }
    geometry.validate()?;

    let scale_factor = geometry.content_width_mm() as f64 / width as f64;
    let page_height_px = geometry.content_height_mm() as f64 / scale_factor;

    if page_height_px < MIN_PAGE_HEIGHT_PX {
        return Err(ExportError::Config(format!(
            "A {} mm page holds {:.3} rows of a {} px wide raster",
            geometry.height_mm, page_height_px, width
        )));
    }

    let total = height as f64;
    let page_count = ((total - ROW_EPSILON) / page_height_px).ceil().max(1.0) as usize;

    let slices = (0..page_count)
        .map(|index| {
            let start = snap_row(index as f64 * page_height_px);
            let end = if index + 1 == page_count {
                total
            } else {
                snap_row((index + 1) as f64 * page_height_px).min(total)
            };

            let y = start.floor() as u32;
            let band_end = (end.ceil() as u32).min(height);
            PageSlice {
                index,
                y,
                height: band_end - y,
                start,
                end,
            }
        })
        .collect();

    Ok(SlicePlan {
        raster_width: width,
        raster_height: height,
        scale_factor,
        page_height_px,
        slices,
    })
}

fn snap_row(row: f64) -> f64 {
    let whole = row.round();
    if (row - whole).abs() < ROW_EPSILON {
        whole
    } else {
        row
    }
}

// =============================================================================
// Tests
// =============================================================================
