//! Layout data types for label sheets
//!
//! Cell geometry lives in millimetres with a top-left origin; everything
//! handed to the renderer is in points with PDF's bottom-left origin.

/// One cell of the label grid, in millimetres relative to the page's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellPosition {
    /// Distance from the left page edge
    pub left: f32,
    /// Distance from the top page edge
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Result of the layout calculation for one page
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Cells per row (grid columns)
    pub labels_per_row: usize,
    /// Cells per column (grid rows)
    pub labels_per_column: usize,
    /// `labels_per_row * labels_per_column`
    pub total_labels: usize,
    /// Cell rectangles in row-major order
    pub label_positions: Vec<CellPosition>,
}

impl SheetLayout {
    /// Number of cells available on each page
    pub fn cells_per_page(&self) -> usize {
        self.label_positions.len()
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }
}

/// Final placement of label content inside its cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentPlacement {
    /// The whole cell in page points
    pub cell: Rect,
    /// Position and size of the scaled content in page points
    pub content_rect: Rect,
    /// Uniform scale applied to the native content size
    pub scale: f32,
}
