use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};
use lopdf::{Document, Object, ObjectId, Stream};
use pdf_paginate::*;
use std::path::Path;

fn create_test_image(width: u32, height: u32) -> DynamicImage {
    // Horizontal stripes so every slice has distinct content
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |_, y| {
        let shade = (y % 256) as u8;
        Rgb([shade, 255 - shade, 128])
    }))
}

fn options_at_scale_one() -> ExportOptions {
    ExportOptions {
        scale: 1,
        ..Default::default()
    }
}

fn number(obj: &Object) -> f32 {
    match obj {
        Object::Integer(i) => *i as f32,
        Object::Real(r) => *r,
        other => panic!("Expected number, got {:?}", other),
    }
}

fn is_image(stream: &Stream) -> bool {
    matches!(
        stream.dict.get(b"Subtype").and_then(|s| s.as_name()),
        Ok(name) if name == b"Image"
    )
}

/// Image XObject drawn on a page: (width, height) in pixels
fn page_image_size(doc: &Document, page_id: ObjectId) -> (i64, i64) {
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
    let image = doc.get_object(image_id).unwrap().as_stream().unwrap();

    let width = image.dict.get(b"Width").unwrap().as_i64().unwrap();
    let height = image.dict.get(b"Height").unwrap().as_i64().unwrap();
    (width, height)
}

#[tokio::test]
async fn test_export_two_pages() {
    let node = create_test_image(1000, 2500);
    let doc = export(&BitmapRasterizer, &node, &options_at_scale_one())
        .await
        .unwrap();

    assert_eq!(doc.page_count(), 2);
    let placements = doc.placements();
    assert_eq!(placements[0].slice.y, 0);
    assert_eq!(placements[0].slice.height, 1415);
    assert_eq!(placements[1].slice.y, 1414);
    assert_eq!(placements[1].slice.height, 1086);

    // Page size never changes, only the image height does
    assert!((placements[0].height_mm - 297.0).abs() < 1e-3);
    assert!((placements[1].height_mm - 228.0).abs() < 1e-3);
    for placement in placements {
        assert_eq!(placement.x_mm, 0.0);
        assert_eq!(placement.y_mm, 0.0);
        assert_eq!(placement.width_mm, 210.0);
    }
}

#[tokio::test]
async fn test_export_applies_capture_scale() {
    let node = create_test_image(500, 1250);
    let doc = export(&BitmapRasterizer, &node, &ExportOptions::default())
        .await
        .unwrap();

    // Scale 2 doubles the raster to 1000x2500
    assert_eq!(doc.plan().raster_width, 1000);
    assert_eq!(doc.plan().raster_height, 2500);
    assert_eq!(doc.page_count(), 2);
}

#[tokio::test]
async fn test_export_short_content_single_page() {
    let node = create_test_image(800, 800);
    let doc = export(&BitmapRasterizer, &node, &options_at_scale_one())
        .await
        .unwrap();

    assert_eq!(doc.page_count(), 1);
    assert_eq!(doc.placements()[0].slice.height, 800);
}

#[tokio::test]
async fn test_export_empty_content() {
    let node = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
    let result = export(&BitmapRasterizer, &node, &options_at_scale_one()).await;

    match result {
        Err(ExportError::EmptyContent { width, height }) => {
            assert_eq!((width, height), (0, 0));
        }
        _ => panic!("Expected EmptyContent error"),
    }
}

#[tokio::test]
async fn test_export_rejects_invalid_options() {
    let node = create_test_image(10, 10);
    let options = ExportOptions {
        scale: 0,
        ..Default::default()
    };

    let result = export(&BitmapRasterizer, &node, &options).await;
    assert!(matches!(result, Err(ExportError::Config(_))));
}

#[test]
fn test_pdf_structure_after_reload() {
    let raster = SourceRaster::new(create_test_image(1000, 2500));
    let output = paginate_raster(&raster, &ExportOptions::default()).unwrap();

    let bytes = output.to_bytes().unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let pages = doc.get_pages();
    assert_eq!(pages.len(), 2);

    let page_ids: Vec<ObjectId> = pages.values().copied().collect();
    for page_id in &page_ids {
        let page = doc.get_dictionary(*page_id).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert!((number(&media_box[2]) - 595.2756).abs() < 1e-2);
        assert!((number(&media_box[3]) - 841.8898).abs() < 1e-2);
    }

    assert_eq!(page_image_size(&doc, page_ids[0]), (1000, 1415));
    assert_eq!(page_image_size(&doc, page_ids[1]), (1000, 1086));
}

/// Operands of the `re` clip and the `cm` placement on a page
fn page_clip_and_image(doc: &Document, page_id: ObjectId) -> ([f32; 4], [f32; 6]) {
    let content = doc.get_and_decode_page_content(page_id).unwrap();
    let operands = |op: &str| -> Vec<f32> {
        content
            .operations
            .iter()
            .find(|operation| operation.operator == op)
            .unwrap()
            .operands
            .iter()
            .map(number)
            .collect()
    };
    let clip = operands("re");
    let cm = operands("cm");
    (
        [clip[0], clip[1], clip[2], clip[3]],
        [cm[0], cm[1], cm[2], cm[3], cm[4], cm[5]],
    )
}

#[test]
fn test_fractional_pages_stay_on_page() {
    // 100 px wide: 141.43 rows per page, 990 rows is exactly 7 pages
    let raster = SourceRaster::new(create_test_image(100, 990));
    let options = ExportOptions {
        encoding: ImageEncoding::Lossless,
        ..options_at_scale_one()
    };
    let output = paginate_raster(&raster, &options).unwrap();

    assert_eq!(output.page_count(), 7);
    for placement in output.placements() {
        assert!(placement.height_mm <= 297.0 + 1e-3);
        assert!((placement.height_mm - 297.0).abs() < 1e-3);
    }

    let doc = output.into_document();
    let page_height_pt = 841.8898;
    for page_id in doc.get_pages().into_values() {
        let (clip, cm) = page_clip_and_image(&doc, page_id);

        // Clip is the content box, never past the page edges
        assert!(clip[1] >= -1e-2);
        assert!(clip[1] + clip[3] <= page_height_pt + 1e-2);

        // The band covers the whole clip so no gap shows at either edge
        assert!(cm[5] <= clip[1] + 1e-2);
        assert!(cm[5] + cm[3] >= clip[1] + clip[3] - 1e-2);
    }
}

#[test]
fn test_jpeg_slices_use_dct() {
    let raster = SourceRaster::new(create_test_image(100, 50));
    let output = paginate_raster(&raster, &ExportOptions::default()).unwrap();

    let doc = output.into_document();
    let images: Vec<_> = doc
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .filter(|stream| is_image(stream))
        .collect();

    assert_eq!(images.len(), 1);
    let filter = images[0].dict.get(b"Filter").unwrap().as_name().unwrap();
    assert_eq!(filter, b"DCTDecode");
    // JPEG start-of-image marker
    assert_eq!(&images[0].content[..2], &[0xFFu8, 0xD8]);
}

#[test]
fn test_lossless_slices_keep_pixels() {
    let raster = SourceRaster::new(create_test_image(4, 3));
    let options = ExportOptions {
        encoding: ImageEncoding::Lossless,
        ..Default::default()
    };
    let bytes = paginate_raster(&raster, &options).unwrap().to_bytes().unwrap();

    let doc = Document::load_mem(&bytes).unwrap();
    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
    let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
    let image_id = xobjects.get(b"Im0").unwrap().as_reference().unwrap();
    let image = doc.get_object(image_id).unwrap().as_stream().unwrap();

    let samples = image.decompressed_content().unwrap_or_else(|_| image.content.clone());
    assert_eq!(samples.len(), 4 * 3 * 3);
    // Row 2, first pixel
    assert_eq!(&samples[24..27], &[2u8, 253, 128]);
}

#[test]
fn test_transparent_capture_is_flattened() {
    let image = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0]));
    let raster = SourceRaster::new(DynamicImage::ImageRgba8(image));
    let options = ExportOptions {
        encoding: ImageEncoding::Lossless,
        ..Default::default()
    };

    let doc = paginate_raster(&raster, &options).unwrap().into_document();
    let image = doc
        .objects
        .values()
        .filter_map(|obj| obj.as_stream().ok())
        .find(|stream| is_image(stream))
        .unwrap();

    let samples = image.decompressed_content().unwrap_or_else(|_| image.content.clone());
    assert!(samples.iter().all(|&b| b == 255));
}

#[test]
fn test_title_written_to_info() {
    let raster = SourceRaster::new(create_test_image(10, 10));
    let options = ExportOptions {
        title: Some("Resume".to_string()),
        ..Default::default()
    };

    let doc = paginate_raster(&raster, &options).unwrap().into_document();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    let title = info.get(b"Title").unwrap().as_str().unwrap();
    assert_eq!(title, b"Resume");
}

#[tokio::test]
async fn test_save_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(constants::DEFAULT_OUTPUT_FILENAME);

    let node = create_test_image(200, 600);
    let doc = export(&BitmapRasterizer, &node, &options_at_scale_one())
        .await
        .unwrap();
    let page_count = doc.page_count();
    save_pdf(doc, &path).await.unwrap();

    assert!(path.exists());
    let loaded = Document::load(&path).unwrap();
    assert_eq!(loaded.get_pages().len(), page_count);
}

#[tokio::test]
async fn test_save_pdf_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("resume.pdf");

    let raster = SourceRaster::new(create_test_image(10, 10));
    let doc = paginate_raster(&raster, &ExportOptions::default()).unwrap();

    match save_pdf(doc, &path).await {
        Err(ExportError::Persistence { path: failed, .. }) => assert_eq!(failed, path),
        _ => panic!("Expected Persistence error"),
    }
}

// =============================================================================
// File rasterizer
// =============================================================================

fn write_capture(path: &Path, width: u32, height: u32) {
    create_test_image(width, height).save(path).unwrap();
}

#[tokio::test]
async fn test_file_rasterizer_export() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("capture.png");
    write_capture(&capture, 500, 1250);

    let doc = export(
        &ImageFileRasterizer::new(),
        capture.as_path(),
        &ExportOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(doc.plan().raster_width, 1000);
    assert_eq!(doc.page_count(), 2);
}

#[tokio::test]
async fn test_file_rasterizer_missing_node() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.png");

    let result = export(
        &ImageFileRasterizer::new(),
        missing.as_path(),
        &ExportOptions::default(),
    )
    .await;
    assert!(matches!(result, Err(ExportError::Rasterization(_))));
}

#[tokio::test]
async fn test_file_rasterizer_undecodable_node() {
    let dir = tempfile::tempdir().unwrap();
    let capture = dir.path().join("capture.png");
    std::fs::write(&capture, b"not an image").unwrap();

    let result = ImageFileRasterizer::new()
        .capture(&capture, &CaptureOptions::default())
        .await;
    assert!(matches!(result, Err(ExportError::Rasterization(_))));
}

#[tokio::test]
async fn test_file_rasterizer_origin_check() {
    let root = tempfile::tempdir().unwrap();
    let outside = tempfile::tempdir().unwrap();

    let inside_capture = root.path().join("capture.png");
    let outside_capture = outside.path().join("capture.png");
    write_capture(&inside_capture, 10, 10);
    write_capture(&outside_capture, 10, 10);

    let rasterizer = ImageFileRasterizer::with_root(root.path());
    let same_origin = CaptureOptions {
        scale: 1,
        allow_cross_origin: false,
    };

    let raster = rasterizer.capture(&inside_capture, &same_origin).await.unwrap();
    assert_eq!((raster.width(), raster.height()), (10, 10));

    let result = rasterizer.capture(&outside_capture, &same_origin).await;
    assert!(matches!(result, Err(ExportError::Rasterization(_))));

    let cross_origin = CaptureOptions {
        allow_cross_origin: true,
        ..same_origin
    };
    assert!(rasterizer.capture(&outside_capture, &cross_origin).await.is_ok());
}
