//! Image XObject creation for page slices

use crate::paginate::PageSlice;
use crate::raster::SourceRaster;
use crate::types::{ImageEncoding, Result};
use image::codecs::jpeg::JpegEncoder;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// Encode the rows of `slice` as an image XObject in `output`.
///
/// JPEG data is stored as-is with `DCTDecode`. Lossless data is stored raw
/// and left compressible so the finished document Flate-encodes it.
pub fn create_slice_xobject(
    output: &mut Document,
    raster: &SourceRaster,
    slice: &PageSlice,
    encoding: ImageEncoding,
) -> Result<ObjectId> {
    let band = raster.band_rgb(slice.y, slice.height);
    let (width, height) = band.dimensions();

    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
    dict.set("BitsPerComponent", Object::Integer(8));

    let stream = match encoding {
        ImageEncoding::Jpeg { quality } => {
            let mut data = Vec::new();
            JpegEncoder::new_with_quality(&mut data, quality).encode_image(&band)?;
            dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
            Stream::new(dict, data).with_compression(false)
        }
        ImageEncoding::Lossless => Stream::new(dict, band.into_raw()),
    };

    Ok(output.add_object(stream))
}
