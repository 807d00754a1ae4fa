//! Content placement within cells
//!
//! This module converts millimetre cells into page points and fits label
//! content into them:
//! - flipping the vertical axis (cells are top-down, PDF is bottom-up)
//! - aspect-fit scaling, centered, never stretched or cropped
//! - the date stamp origin near the cell's lower-right corner

use crate::constants::{DATE_BOTTOM_INSET_MM, DATE_RIGHT_INSET_MM, mm_to_pt};

use super::{CellPosition, ContentPlacement, Rect};

/// Convert a cell to page points with a bottom-left origin.
///
/// # Arguments
/// * `cell` - The cell in millimetres, top-left origin
/// * `page_height_mm` - Height of the page the cell lives on
pub fn cell_rect_pt(cell: &CellPosition, page_height_mm: f32) -> Rect {
    Rect::new(
        mm_to_pt(cell.left),
        mm_to_pt(page_height_mm - cell.top - cell.height),
        mm_to_pt(cell.width),
        mm_to_pt(cell.height),
    )
}

/// Fit content of the given native size into a cell.
///
/// The smaller of the width and height ratios is applied to both axes and
/// the result is centered, so the offsets are never negative.
pub fn fit_content(cell: Rect, native_width: f32, native_height: f32) -> ContentPlacement {
    let scale = fit_scale(native_width, native_height, cell.width, cell.height);

    let scaled_width = native_width * scale;
    let scaled_height = native_height * scale;

    let x_offset = (cell.width - scaled_width) / 2.0;
    let y_offset = (cell.height - scaled_height) / 2.0;

    ContentPlacement {
        cell,
        content_rect: Rect::new(
            cell.x + x_offset,
            cell.y + y_offset,
            scaled_width,
            scaled_height,
        ),
        scale,
    }
}

/// Baseline origin of the date stamp for a cell.
///
/// The text starts `DATE_RIGHT_INSET_MM` left of the cell's right edge and
/// sits `DATE_BOTTOM_INSET_MM` above its bottom edge.
pub fn date_origin(cell: Rect) -> (f32, f32) {
    (
        cell.right() - mm_to_pt(DATE_RIGHT_INSET_MM),
        cell.y + mm_to_pt(DATE_BOTTOM_INSET_MM),
    )
}

/// Scale factor for fitting source to target dimensions.
fn fit_scale(src_width: f32, src_height: f32, target_width: f32, target_height: f32) -> f32 {
    if src_width <= 0.0 || src_height <= 0.0 {
        return 0.0;
    }
    let scale_w = target_width / src_width;
    let scale_h = target_height / src_height;
    scale_w.min(scale_h).max(0.0)
}
