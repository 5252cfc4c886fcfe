//! Output page rendering

use crate::constants::{SLICE_XOBJECT_NAME, mm_to_pt};
use crate::types::{PageGeometry, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Where a slice image sits on its page, in points (PDF user space)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceRect {
    /// Left edge
    pub x: f32,
    /// Bottom edge (PDF y grows upwards)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl SliceRect {
    /// Anchor a slice of `height_mm` at the top-left of the content box
    pub fn top_left(geometry: &PageGeometry, height_mm: f32) -> Self {
        Self::shifted(geometry, 0.0, height_mm)
    }

    /// Like `top_left`, with the top `offset_mm` raised above the content box
    pub fn shifted(geometry: &PageGeometry, offset_mm: f32, height_mm: f32) -> Self {
        Self {
            x: mm_to_pt(geometry.margin_mm),
            y: mm_to_pt(geometry.height_mm - geometry.margin_mm + offset_mm - height_mm),
            width: mm_to_pt(geometry.content_width_mm()),
            height: mm_to_pt(height_mm),
        }
    }
}

/// Render one output page drawing the image XObject `image_id` into `image`.
///
/// Anything outside `clip` is not painted.
pub fn render_slice_page(
    output: &mut Document,
    parent_pages_id: ObjectId,
    geometry: &PageGeometry,
    image_id: ObjectId,
    image: &SliceRect,
    clip: &SliceRect,
) -> Result<ObjectId> {
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(mm_to_pt(geometry.width_mm)),
            Object::Real(mm_to_pt(geometry.height_mm)),
        ]),
    );

    let mut xobjects = Dictionary::new();
    xobjects.set(SLICE_XOBJECT_NAME, Object::Reference(image_id));

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    let content = generate_draw_command(SLICE_XOBJECT_NAME, image, clip);
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

/// Image space is the unit square, so the CTM scales it straight to `image`.
fn generate_draw_command(xobject_name: &str, image: &SliceRect, clip: &SliceRect) -> String {
    format!(
        "q {} {} {} {} re W n {} 0 0 {} {} {} cm /{} Do Q\n",
        clip.x,
        clip.y,
        clip.width,
        clip.height,
        image.width,
        image.height,
        image.x,
        image.y,
        xobject_name
    )
}
