//! Output page rendering for label sheets

use crate::constants::{DATE_FONT, DATE_FONT_SIZE, DATE_GRAY_LEVEL};
use crate::layout::{ContentPlacement, Rect, date_origin, fit_content};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::{EmbeddedContent, EmbeddedKind};

/// Resource name of the date font on every page
const DATE_FONT_RESOURCE: &str = "F1";

/// What to draw into one cell of a page
#[derive(Debug, Clone, Copy)]
pub struct CellDraw<'a> {
    /// Cell bounds in page points
    pub cell: Rect,
    /// Embedded label content, or `None` to leave the cell blank
    pub content: Option<&'a EmbeddedContent>,
    /// Already formatted date text
    pub date_text: Option<&'a str>,
}

/// Add the built-in date font to the output document
pub fn create_date_font(output: &mut Document) -> ObjectId {
    let mut font_dict = Dictionary::new();
    font_dict.set("Type", Object::Name(b"Font".to_vec()));
    font_dict.set("Subtype", Object::Name(b"Type1".to_vec()));
    font_dict.set("BaseFont", Object::Name(DATE_FONT.as_bytes().to_vec()));
    font_dict.set("Encoding", Object::Name(b"WinAnsiEncoding".to_vec()));
    output.add_object(font_dict)
}

/// Render one label sheet page.
///
/// # Arguments
/// * `output` - The output document
/// * `parent_pages_id` - The parent Pages object ID
/// * `sheet_width_pt` / `sheet_height_pt` - Page size in points
/// * `cells` - Cells in placement order; cells past the end stay empty
/// * `date_font_id` - Font used for date stamps, required if any cell has a date
pub fn render_label_page(
    output: &mut Document,
    parent_pages_id: ObjectId,
    sheet_width_pt: f32,
    sheet_height_pt: f32,
    cells: &[CellDraw<'_>],
    date_font_id: Option<ObjectId>,
) -> Result<ObjectId> {
    let mut page_dict = Dictionary::new();
    page_dict.set("Type", Object::Name(b"Page".to_vec()));
    page_dict.set("Parent", Object::Reference(parent_pages_id));
    page_dict.set(
        "MediaBox",
        Object::Array(vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(sheet_width_pt),
            Object::Real(sheet_height_pt),
        ]),
    );

    let mut content_ops = Vec::new();
    let mut xobjects = Dictionary::new();
    let mut uses_font = false;

    for draw in cells {
        if let Some(embedded) = draw.content {
            let placement = fit_content(draw.cell, embedded.native_width, embedded.native_height);
            xobjects.set(
                embedded.name.as_bytes(),
                Object::Reference(embedded.xobject_id),
            );
            content_ops.push(generate_placement_command(embedded, &placement));
        }

        if let (Some(text), Some(_)) = (draw.date_text, date_font_id) {
            let (x, y) = date_origin(draw.cell);
            content_ops.push(generate_date_command(text, x, y));
            uses_font = true;
        }
    }

    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));
    if let (true, Some(font_id)) = (uses_font, date_font_id) {
        let mut fonts = Dictionary::new();
        fonts.set(DATE_FONT_RESOURCE, Object::Reference(font_id));
        resources.set("Font", Object::Dictionary(fonts));
    }

    let content = content_ops.join("");
    let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

    page_dict.set("Contents", Object::Reference(content_id));
    page_dict.set("Resources", Object::Dictionary(resources));

    Ok(output.add_object(page_dict))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Generate the content stream command that draws embedded content.
fn generate_placement_command(embedded: &EmbeddedContent, placement: &ContentPlacement) -> String {
    let rect = &placement.content_rect;
    match embedded.kind {
        EmbeddedKind::Image => format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            rect.width, rect.height, rect.x, rect.y, embedded.name
        ),
        EmbeddedKind::Form { origin_x, origin_y } => {
            let scale = placement.scale;
            format!(
                "q {} 0 0 {} {} {} cm /{} Do Q\n",
                scale,
                scale,
                rect.x - origin_x * scale,
                rect.y - origin_y * scale,
                embedded.name
            )
        }
    }
}

/// Generate the content stream command for a date stamp.
fn generate_date_command(text: &str, x: f32, y: f32) -> String {
    format!(
        "q {g} {g} {g} rg BT /{} {} Tf {} {} Td ({}) Tj ET Q\n",
        DATE_FONT_RESOURCE,
        DATE_FONT_SIZE,
        x,
        y,
        escape_pdf_string(text),
        g = DATE_GRAY_LEVEL,
    )
}

/// Escape a string for use inside a PDF literal string.
///
/// Characters outside printable ASCII are replaced with `?`, since the date
/// font is a standard Type1 font.
fn escape_pdf_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            ' '..='~' => escaped.push(ch),
            _ => escaped.push('?'),
        }
    }
    escaped
}
