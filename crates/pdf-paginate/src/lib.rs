pub mod constants;
pub mod export;
mod io;
mod options;
pub mod paginate;
pub mod raster;
pub mod render;
mod stats;
mod types;

pub use export::{OutputDocument, PagePlacement, export, paginate_raster};
pub use io::save_pdf;
pub use options::*;
pub use paginate::{PageSlice, SlicePlan, plan_slices};
pub use raster::{BitmapRasterizer, CaptureOptions, ImageFileRasterizer, Rasterizer, SourceRaster};
pub use stats::calculate_statistics;
pub use types::*;
