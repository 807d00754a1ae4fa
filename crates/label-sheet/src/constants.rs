//! Shared constants for label sheet rendering
//!
//! This module centralizes the fixed page geometry, date stamp offsets and
//! workload limits used throughout layout and compositing.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter, as used for every mm value placed on the sheet
pub const POINTS_PER_MM: f32 = 2.83465;

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Page Dimensions
// =============================================================================

/// Output sheet width (A4)
pub const SHEET_WIDTH_MM: f32 = 210.0;

/// Output sheet height (A4)
pub const SHEET_HEIGHT_MM: f32 = 297.0;

/// Assumed size of an embedded PDF page that carries no MediaBox (US Letter)
pub const DEFAULT_PAGE_DIMENSIONS: (f32, f32) = (612.0, 792.0);

// =============================================================================
// Date Stamp
// =============================================================================

/// Distance of the date text origin from the cell's right edge
pub const DATE_RIGHT_INSET_MM: f32 = 30.0;

/// Distance of the date baseline above the cell's bottom edge
pub const DATE_BOTTOM_INSET_MM: f32 = 15.0;

/// Date font size (points)
pub const DATE_FONT_SIZE: f32 = 11.0;

/// Date fill color (RGB gray level)
pub const DATE_GRAY_LEVEL: f32 = 0.3;

/// Built-in font used for the date stamp
pub const DATE_FONT: &str = "Helvetica";

// =============================================================================
// Workload Limits
// =============================================================================

/// Maximum copies of a single label in one print request
pub const MAX_QUANTITY_PER_LABEL: u32 = 1000;

/// Maximum label instances (after quantity expansion) in one print job
pub const MAX_INSTANCES_PER_JOB: usize = 5000;

// =============================================================================
// Label Ingestion
// =============================================================================

/// Largest label file accepted for ingestion (10 MiB)
pub const MAX_LABEL_FILE_BYTES: usize = 10 * 1024 * 1024;

/// MIME types a label file may carry
pub const ALLOWED_LABEL_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "application/pdf"];
