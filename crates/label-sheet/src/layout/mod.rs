//! Layout calculation modules for label sheets
//!
//! This module handles all the geometric calculations:
//! - Grid layout (cell rectangles from template geometry)
//! - Content placement (unit conversion, axis flip, aspect fit, date origin)

mod grid;
mod placement;
mod types;

pub use grid::*;
pub use placement::*;
pub use types::*;
