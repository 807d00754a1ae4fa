use crate::compose::{instance_count, page_count};
use crate::label::ResolvedLabel;
use crate::template::Template;

/// Summary of how a job fills its sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetStatistics {
    pub instances: usize,
    pub cells_per_page: usize,
    pub pages: usize,
    /// Unused cells on the last page
    pub empty_cells: usize,
}

/// Calculate statistics for a job without rendering it
pub fn calculate_statistics(template: &Template, labels: &[ResolvedLabel]) -> SheetStatistics {
    let instances = instance_count(labels);
    let cells_per_page = template.cells_per_page();
    let pages = page_count(instances, cells_per_page);

    SheetStatistics {
        instances,
        cells_per_page,
        pages,
        empty_cells: pages.saturating_mul(cells_per_page).saturating_sub(instances),
    }
}
