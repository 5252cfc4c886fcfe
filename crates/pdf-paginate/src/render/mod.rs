//! PDF rendering modules for export
//!
//! This module handles all PDF-specific operations:
//! - Encoding raster slices as image XObjects
//! - Building output pages that draw one slice each
//! - Assembling the page tree, catalog and document info

mod document;
mod page;
mod xobject;

pub use document::{finish_document, new_document};
pub use page::{SliceRect, render_slice_page};
pub use xobject::create_slice_xobject;
