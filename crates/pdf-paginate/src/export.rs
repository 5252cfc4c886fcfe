//! Raster export - slicing one capture across fixed-size PDF pages
//!
//! The export runs in three steps:
//! 1. Capture the node once through a `Rasterizer`
//! 2. Plan page-height slices over the raster
//! 3. Embed each slice as an image on its own page

use crate::options::ExportOptions;
use crate::paginate::{PageSlice, SlicePlan, plan_slices};
use crate::raster::{Rasterizer, SourceRaster};
use crate::render::{
    SliceRect, create_slice_xobject, finish_document, new_document, render_slice_page,
};
use crate::types::*;
use lopdf::Document;

/// Where one slice landed, in millimeters measured from the page's top-left.
///
/// `height_mm` is the visible height after clipping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagePlacement {
    pub slice: PageSlice,
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// A finished export, not yet written anywhere
#[derive(Debug, Clone)]
pub struct OutputDocument {
    document: Document,
    plan: SlicePlan,
    placements: Vec<PagePlacement>,
}

impl OutputDocument {
    pub fn page_count(&self) -> usize {
        self.placements.len()
    }

    pub fn placements(&self) -> &[PagePlacement] {
        &self.placements
    }

    pub fn plan(&self) -> &SlicePlan {
        &self.plan
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn statistics(&self) -> ExportStatistics {
        self.plan.statistics()
    }

    /// Serialize the PDF
    pub fn to_bytes(mut self) -> Result<Vec<u8>> {
        let mut writer = Vec::new();
        self.document.save_to(&mut writer)?;
        Ok(writer)
    }
}

/// Main export function
pub async fn export<R: Rasterizer>(
    rasterizer: &R,
    node: &R::Node,
    options: &ExportOptions,
) -> Result<OutputDocument> {
    options.validate()?;

    let raster = rasterizer.capture(node, &options.capture_options()).await?;
    let options = options.clone();

    // Slicing and encoding are CPU-bound, spawn blocking
    tokio::task::spawn_blocking(move || paginate_raster(&raster, &options)).await?
}

/// Slice an already captured raster into a paginated document.
pub fn paginate_raster(raster: &SourceRaster, options: &ExportOptions) -> Result<OutputDocument> {
    let geometry = options.geometry();
    let plan = plan_slices(raster.width(), raster.height(), &geometry)?;

    log::debug!(
        "Paginating {}x{} px raster: {:.4} mm/px, {:.2} px per page, {} page(s)",
        plan.raster_width,
        plan.raster_height,
        plan.scale_factor,
        plan.page_height_px,
        plan.page_count()
    );

    let (mut doc, pages_id) = new_document();
    let mut page_ids = Vec::with_capacity(plan.page_count());
    let mut placements = Vec::with_capacity(plan.page_count());

    for slice in &plan.slices {
        let height_mm = plan.slice_height_mm(slice) as f32;
        let offset_mm = (slice.offset_rows() * plan.scale_factor) as f32;
        let band_mm = plan.band_height_mm(slice) as f32;

        let image_id = create_slice_xobject(&mut doc, raster, slice, options.encoding)?;
        let image = SliceRect::shifted(&geometry, offset_mm, band_mm);
        let clip = SliceRect::top_left(&geometry, height_mm);
        let page_id = render_slice_page(&mut doc, pages_id, &geometry, image_id, &image, &clip)?;
        page_ids.push(page_id);

        placements.push(PagePlacement {
            slice: *slice,
            x_mm: geometry.margin_mm,
            y_mm: geometry.margin_mm,
            width_mm: geometry.content_width_mm(),
            height_mm,
        });
    }

    finish_document(&mut doc, pages_id, &page_ids, options.title.as_deref());

    if options.encoding == ImageEncoding::Lossless {
        doc.compress();
    }

    Ok(OutputDocument {
        document: doc,
        plan,
        placements,
    })
}
