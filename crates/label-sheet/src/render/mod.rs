//! PDF rendering modules for label sheets
//!
//! This module handles all PDF-specific operations:
//! - Creating Form XObjects from embedded label PDFs
//! - Creating Image XObjects from JPEG labels
//! - Building output pages with placed labels and date stamps

mod jpeg;
mod page;
mod xobject;

pub use jpeg::{JpegColor, JpegInfo, create_jpeg_xobject, read_jpeg_info};
pub use page::*;
pub use xobject::{copy_object_deep, create_page_xobject, first_page_id, page_bounds};

use crate::label::LabelContent;
use crate::types::Result;
use lopdf::{Document, ObjectId};
use std::collections::HashMap;

/// How an embedded XObject maps onto its native size
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmbeddedKind {
    /// Image XObject drawn into the unit square
    Image,
    /// Form XObject whose bounding box starts at the given origin
    Form { origin_x: f32, origin_y: f32 },
}

/// Label content that has been added to the output document once and can be
/// drawn into any number of cells
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedContent {
    /// Resource name used in page content streams
    pub name: String,
    pub xobject_id: ObjectId,
    /// Native width (pixels for images, points for PDF pages)
    pub native_width: f32,
    /// Native height (pixels for images, points for PDF pages)
    pub native_height: f32,
    pub kind: EmbeddedKind,
}

/// Embed label content into the output document.
///
/// JPEGs become an Image XObject; PDFs contribute their first page as a Form
/// XObject.
pub fn embed_content(
    output: &mut Document,
    content: &LabelContent,
    name: String,
) -> Result<EmbeddedContent> {
    match content {
        LabelContent::Raster(bytes) => {
            let (xobject_id, info) = create_jpeg_xobject(output, bytes)?;
            Ok(EmbeddedContent {
                name,
                xobject_id,
                native_width: info.width as f32,
                native_height: info.height as f32,
                kind: EmbeddedKind::Image,
            })
        }
        LabelContent::EmbeddedPage(bytes) => {
            let source = Document::load_mem(bytes)?;
            let page_id = first_page_id(&source)?;
            let bounds = page_bounds(&source, page_id)?;

            let mut cache = HashMap::new();
            let xobject_id = create_page_xobject(output, &source, page_id, &mut cache)?;
            Ok(EmbeddedContent {
                name,
                xobject_id,
                native_width: bounds.width,
                native_height: bounds.height,
                kind: EmbeddedKind::Form {
                    origin_x: bounds.x,
                    origin_y: bounds.y,
                },
            })
        }
    }
}
