//! Quantity expansion and pagination

use crate::label::ResolvedLabel;

/// One physical copy of a label on the sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelInstance<'a> {
    /// Position of the label in the input list
    pub label_index: usize,
    /// Running number of this copy across the whole job
    pub instance_index: usize,
    pub label: &'a ResolvedLabel,
}

/// Expand labels into instances, `quantity` consecutive copies each, in input order.
///
/// Allocates one entry per copy; check [`instance_count`] against the job
/// limit first.
pub fn expand_instances(labels: &[ResolvedLabel]) -> Vec<LabelInstance<'_>> {
    let mut instances = Vec::with_capacity(instance_count(labels));

    for (label_index, label) in labels.iter().enumerate() {
        for _ in 0..label.quantity {
            instances.push(LabelInstance {
                label_index,
                instance_index: instances.len(),
                label,
            });
        }
    }

    instances
}

/// Total instances a label list expands to, saturating at `usize::MAX`
pub fn instance_count(labels: &[ResolvedLabel]) -> usize {
    labels
        .iter()
        .fold(0usize, |total, l| total.saturating_add(l.quantity as usize))
}

/// Pages needed for `instances` copies with `cells_per_page` cells each
pub fn page_count(instances: usize, cells_per_page: usize) -> usize {
    if cells_per_page == 0 {
        return 0;
    }
    instances.div_ceil(cells_per_page)
}

/// Split instances into page-sized slices; the last one may be short
pub fn paginate<'s, T>(items: &'s [T], cells_per_page: usize) -> impl Iterator<Item = &'s [T]> {
    items.chunks(cells_per_page.max(1))
}
