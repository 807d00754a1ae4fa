//! Sheet compositing - placing label instances onto A4 pages
//!
//! This module orchestrates rendering:
//! 1. Compute the cell grid from the template
//! 2. Expand labels by quantity and slice them into pages
//! 3. Embed each distinct label once and draw it into its cells
//! 4. Stamp dates and assemble the page tree

mod instances;
mod io;

pub use instances::{LabelInstance, expand_instances, instance_count, page_count, paginate};
pub use io::{load_pdf, save_pdf};

use crate::constants::{MAX_INSTANCES_PER_JOB, SHEET_HEIGHT_MM, SHEET_WIDTH_MM, mm_to_pt};
use crate::date::format_label_date;
use crate::label::ResolvedLabel;
use crate::layout::cell_rect_pt;
use crate::render::{CellDraw, EmbeddedContent, create_date_font, embed_content, render_label_page};
use crate::template::Template;
use crate::types::*;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// A rendered label sheet document
#[derive(Debug)]
pub struct SheetOutput {
    pub document: Document,
    pub page_count: usize,
    /// Instances after quantity expansion, including ones left blank
    pub instance_count: usize,
    /// Everything that was skipped or degraded while rendering
    pub warnings: Vec<RenderWarning>,
}

impl SheetOutput {
    /// Serialize the document to PDF bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut writer = Vec::new();
        self.document.save_to(&mut writer)?;
        Ok(writer)
    }
}

/// Per-label embedding state, filled on first use
enum Embedding {
    Pending,
    Ready(EmbeddedContent),
    Failed(String),
}

/// Render labels onto as many A4 sheets as they need.
///
/// Content problems never abort the render: the affected cells stay blank
/// and a [`RenderWarning`] is recorded for each of them.
pub fn render_sheet(template: &Template, labels: &[ResolvedLabel]) -> Result<SheetOutput> {
    let layout = template.layout();
    let cells_per_page = layout.cells_per_page();

    let requested = instance_count(labels);
    if requested > MAX_INSTANCES_PER_JOB {
        return Err(LabelSheetError::Config(format!(
            "{} label instances requested, at most {} allowed",
            requested, MAX_INSTANCES_PER_JOB
        )));
    }
    if cells_per_page == 0 && requested > 0 {
        return Err(LabelSheetError::Config(format!(
            "template '{}' has no cells on the page",
            template.name
        )));
    }

    let instances = expand_instances(labels);

    log::info!(
        "Rendering {} label instances on template '{}' ({}x{}, {} pages)",
        instances.len(),
        template.name,
        layout.labels_per_row,
        layout.labels_per_column,
        page_count(instances.len(), cells_per_page)
    );

    let mut warnings = Vec::new();
    let date_texts = format_dates(labels, &mut warnings);

    let sheet_width_pt = mm_to_pt(SHEET_WIDTH_MM);
    let sheet_height_pt = mm_to_pt(SHEET_HEIGHT_MM);
    let cell_rects: Vec<_> = layout
        .label_positions
        .iter()
        .map(|cell| cell_rect_pt(cell, SHEET_HEIGHT_MM))
        .collect();

    let mut output = Document::with_version("1.7");
    let pages_tree_id = output.new_object_id();
    let mut page_refs = Vec::new();

    let date_font_id: Option<ObjectId> = if date_texts.iter().any(Option::is_some) {
        Some(create_date_font(&mut output))
    } else {
        None
    };

    // Embed every label that is actually placed, once
    let mut embeddings: Vec<Embedding> = labels.iter().map(|_| Embedding::Pending).collect();
    for instance in &instances {
        let idx = instance.label_index;
        if let Embedding::Pending = embeddings[idx] {
            embeddings[idx] = embed_label(&mut output, idx, instance.label);
        }
    }

    for (page_index, page_instances) in paginate(&instances, cells_per_page).enumerate() {
        let mut cells = Vec::with_capacity(page_instances.len());

        for (cell_index, instance) in page_instances.iter().enumerate() {
            let label = instance.label;
            let content = match (&label.content, &embeddings[instance.label_index]) {
                (Err(reason), _) => {
                    warnings.push(RenderWarning::UnusableContent {
                        label: label.name.clone(),
                        instance: instance.instance_index,
                        reason: reason.to_string(),
                    });
                    None
                }
                (Ok(_), Embedding::Failed(reason)) => {
                    warnings.push(RenderWarning::EmbedFailed {
                        label: label.name.clone(),
                        instance: instance.instance_index,
                        reason: reason.clone(),
                    });
                    None
                }
                (Ok(_), Embedding::Ready(embedded)) => Some(embedded),
                (Ok(_), Embedding::Pending) => None,
            };

            log::debug!(
                "Page {} cell {}: '{}' (instance {})",
                page_index + 1,
                cell_index,
                label.name,
                instance.instance_index
            );

            cells.push(CellDraw {
                cell: cell_rects[cell_index],
                content,
                date_text: date_texts[instance.label_index].as_deref(),
            });
        }

        let page_id = render_label_page(
            &mut output,
            pages_tree_id,
            sheet_width_pt,
            sheet_height_pt,
            &cells,
            date_font_id,
        )?;
        page_refs.push(Object::Reference(page_id));
    }

    let page_count = page_refs.len();
    finish_document(&mut output, pages_tree_id, page_refs);

    for warning in &warnings {
        log::warn!("{}", warning);
    }

    Ok(SheetOutput {
        document: output,
        page_count,
        instance_count: instances.len(),
        warnings,
    })
}

/// Embed one label's content, turning failures into a recorded reason
fn embed_label(output: &mut Document, label_index: usize, label: &ResolvedLabel) -> Embedding {
    let Ok(content) = &label.content else {
        // Reported per instance by the caller
        return Embedding::Failed(String::new());
    };
    match embed_content(output, content, format!("L{}", label_index)) {
        Ok(embedded) => Embedding::Ready(embedded),
        Err(e) => Embedding::Failed(e.to_string()),
    }
}

/// Format each label's date once; unparseable dates are printed verbatim
fn format_dates(
    labels: &[ResolvedLabel],
    warnings: &mut Vec<RenderWarning>,
) -> Vec<Option<String>> {
    labels
        .iter()
        .map(|label| {
            let raw = label.date.as_deref()?.trim();
            if raw.is_empty() {
                return None;
            }
            match format_label_date(raw) {
                Some(formatted) => Some(formatted),
                None => {
                    warnings.push(RenderWarning::UnparsedDate {
                        label: label.name.clone(),
                        date: raw.to_string(),
                    });
                    Some(raw.to_string())
                }
            }
        })
        .collect()
}

/// Write the page tree and catalog
fn finish_document(output: &mut Document, pages_tree_id: ObjectId, page_refs: Vec<Object>) {
    let count = page_refs.len() as i64;
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(page_refs)),
        ("Count", Object::Integer(count)),
    ]);
    output
        .objects
        .insert(pages_tree_id, Object::Dictionary(pages_dict));

    let catalog_id = output.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_tree_id)),
    ]));

    output.trailer.set("Root", catalog_id);
}
