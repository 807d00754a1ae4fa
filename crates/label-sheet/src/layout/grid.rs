//! Grid layout calculation
//!
//! Maps a template's margins, spacing and cell size onto an ordered list of
//! cell rectangles. The same function drives on-screen previews and PDF
//! placement, so it must stay pure and deterministic.

use super::{CellPosition, SheetLayout};

// =============================================================================
// Grid Creation
// =============================================================================

/// Compute the cell grid for one page.
///
/// All lengths are millimetres. `columns`/`rows` of `0` mean "as many as fit"
/// inside the margins; any positive value is used as given. Cells are not
/// checked against the page bounds, so inconsistent templates can produce
/// cells that run off the sheet.
///
/// # Arguments
/// * `page_width` / `page_height` - Page size
/// * `top_margin` .. `right_margin` - Distance from each page edge to the grid
/// * `h_spacing` / `v_spacing` - Gap between neighbouring columns / rows
/// * `label_width` / `label_height` - Cell size
/// * `columns` / `rows` - Grid dimensions
#[allow(clippy::too_many_arguments)]
pub fn compute_layout(
    page_width: f32,
    page_height: f32,
    top_margin: f32,
    bottom_margin: f32,
    left_margin: f32,
    right_margin: f32,
    h_spacing: f32,
    v_spacing: f32,
    label_width: f32,
    label_height: f32,
    columns: usize,
    rows: usize,
) -> SheetLayout {
    let usable_width = page_width - left_margin - right_margin;
    let usable_height = page_height - top_margin - bottom_margin;

    let labels_per_row = if columns > 0 {
        columns
    } else {
        cells_that_fit(usable_width, label_width, h_spacing)
    };
    let labels_per_column = if rows > 0 {
        rows
    } else {
        cells_that_fit(usable_height, label_height, v_spacing)
    };

    let mut label_positions = Vec::with_capacity(labels_per_row * labels_per_column);
    for row in 0..labels_per_column {
        for col in 0..labels_per_row {
            label_positions.push(CellPosition {
                left: left_margin + col as f32 * (label_width + h_spacing),
                top: top_margin + row as f32 * (label_height + v_spacing),
                width: label_width,
                height: label_height,
            });
        }
    }

    SheetLayout {
        labels_per_row,
        labels_per_column,
        total_labels: labels_per_row * labels_per_column,
        label_positions,
    }
}

/// How many cells of `size` separated by `spacing` fit in `available`
fn cells_that_fit(available: f32, size: f32, spacing: f32) -> usize {
    let pitch = size + spacing;
    if pitch <= 0.0 {
        return 0;
    }
    let count = ((available + spacing) / pitch).floor();
    if count.is_finite() && count > 0.0 {
        count as usize
    } else {
        0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_layout() -> SheetLayout {
        compute_layout(
            210.0, 297.0, 4.0, 4.0, 4.0, 4.0, 3.0, 0.0, 63.5, 72.0, 3, 4,
        )
    }

    #[test]
    fn test_explicit_grid_dimensions() {
        let layout = reference_layout();
        assert_eq!(layout.labels_per_row, 3);
        assert_eq!(layout.labels_per_column, 4);
        assert_eq!(layout.total_labels, 12);
        assert_eq!(layout.label_positions.len(), 12);
    }

    #[test]
    fn test_cell_formula() {
        let layout = reference_layout();
        // row 1, col 2
        let cell = layout.label_positions[3 + 2];
        assert_eq!(cell.left, 137.0);
        assert_eq!(cell.top, 76.0);
        assert_eq!(cell.width, 63.5);
        assert_eq!(cell.height, 72.0);
    }

    #[test]
    fn test_row_major_order() {
        let layout = reference_layout();
        let first_row: Vec<f32> = layout.label_positions[..3].iter().map(|c| c.top).collect();
        assert_eq!(first_row, vec![4.0, 4.0, 4.0]);
        assert_eq!(layout.label_positions[0].left, 4.0);
        assert_eq!(layout.label_positions[1].left, 70.5);
        assert_eq!(layout.label_positions[3].left, 4.0);
        assert_eq!(layout.label_positions[3].top, 76.0);
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(reference_layout(), reference_layout());
    }

    #[test]
    fn test_fallback_counts_when_unspecified() {
        // usable width 200, pitch 53 -> (200 + 3) / 53 = 3.83 -> 3
        // usable height 287, pitch 30 -> 287 / 30 = 9.56 -> 9
        let layout = compute_layout(
            210.0, 297.0, 5.0, 5.0, 5.0, 5.0, 3.0, 0.0, 50.0, 30.0, 0, 0,
        );
        assert_eq!(layout.labels_per_row, 3);
        assert_eq!(layout.labels_per_column, 9);
        assert_eq!(layout.total_labels, 27);
    }

    #[test]
    fn test_fallback_never_negative() {
        let layout = compute_layout(
            210.0, 297.0, 200.0, 200.0, 200.0, 200.0, 0.0, 0.0, 50.0, 30.0, 0, 0,
        );
        assert_eq!(layout.total_labels, 0);
        assert!(layout.label_positions.is_empty());
    }

    #[test]
    fn test_overflow_is_not_clamped() {
        let layout = compute_layout(
            210.0, 297.0, 4.0, 4.0, 4.0, 4.0, 3.0, 0.0, 100.0, 100.0, 3, 4,
        );
        let last = layout.label_positions.last().copied().unwrap();
        assert!(last.left + last.width > 210.0);
        assert!(last.top + last.height > 297.0);
    }
}
