use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};
use label_sheet::*;
use lopdf::{Dictionary, Document, Object, Stream};

fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let pixels = vec![200u8; (width * height * 3) as usize];
    let mut out = Vec::new();
    JpegEncoder::new(&mut out)
        .write_image(&pixels, width, height, ExtendedColorType::Rgb8)
        .unwrap();
    out
}

fn pdf_bytes(width: i64, height: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let content_id = doc.add_object(Stream::new(
        Dictionary::new(),
        b"0 0 1 rg 0 0 10 10 re f".to_vec(),
    ));
    let page_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(pages_id)),
        (
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ]),
        ),
        ("Resources", Object::Dictionary(Dictionary::new())),
        ("Contents", Object::Reference(content_id)),
    ]));

    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ("Count", Object::Integer(1)),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", catalog_id);

    let mut writer = Vec::new();
    doc.save_to(&mut writer).unwrap();
    writer
}

fn jpeg_label(name: &str, quantity: u32, date: Option<&str>) -> ResolvedLabel {
    let asset = LabelAsset::from_file_bytes(name, &jpeg_bytes(40, 20), "image/jpeg").unwrap();
    ResolvedLabel::from_asset(None, &asset, quantity, date.map(str::to_string))
}

fn pdf_label(name: &str, quantity: u32) -> ResolvedLabel {
    let asset = LabelAsset::from_file_bytes(name, &pdf_bytes(200, 100), "application/pdf").unwrap();
    ResolvedLabel::from_asset(None, &asset, quantity, None)
}

fn six_cell_template() -> Template {
    Template {
        columns: 2,
        rows: 3,
        ..Template::default()
    }
}

/// Decoded content streams of every output page, in page order
fn page_contents(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|&id| String::from_utf8_lossy(&doc.get_page_content(id).unwrap()).into_owned())
        .collect()
}

#[test]
fn test_pagination_fills_pages_in_order() {
    let labels = vec![jpeg_label("A", 10, None)];
    let output = render_sheet(&six_cell_template(), &labels).unwrap();

    assert_eq!(output.page_count, 2);
    assert_eq!(output.instance_count, 10);
    assert_eq!(output.document.get_pages().len(), 2);

    let contents = page_contents(&output.document);
    assert_eq!(contents[0].matches(" Do Q").count(), 6);
    assert_eq!(contents[1].matches(" Do Q").count(), 4);
    assert!(output.warnings.is_empty());
}

#[test]
fn test_each_label_embedded_once() {
    let labels = vec![jpeg_label("A", 3, None), jpeg_label("B", 2, None)];
    let output = render_sheet(&six_cell_template(), &labels).unwrap();

    let images = output
        .document
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| s.dict.get(b"Subtype").and_then(|n| n.as_name()).ok() == Some(&b"Image"[..]))
        .count();
    assert_eq!(images, 2);

    let content = &page_contents(&output.document)[0];
    assert_eq!(content.matches("/L0 Do").count(), 3);
    assert_eq!(content.matches("/L1 Do").count(), 2);
}

#[test]
fn test_pages_are_a4() {
    let output = render_sheet(&six_cell_template(), &[jpeg_label("A", 1, None)]).unwrap();
    let page_id = *output.document.get_pages().values().next().unwrap();
    let page = output.document.get_dictionary(page_id).unwrap();
    let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();

    let width = media_box[2].as_float().unwrap();
    let height = media_box[3].as_float().unwrap();
    assert!((width - 210.0 * 2.83465).abs() < 0.01);
    assert!((height - 297.0 * 2.83465).abs() < 0.01);
}

#[test]
fn test_dates_only_on_dated_labels() {
    let labels = vec![
        jpeg_label("Dated", 2, Some("2024-01-15")),
        jpeg_label("Plain", 3, None),
    ];
    let output = render_sheet(&six_cell_template(), &labels).unwrap();
    let content = &page_contents(&output.document)[0];

    assert_eq!(content.matches("(15.01.2024) Tj").count(), 2);
    assert_eq!(content.matches(" Tj").count(), 2);
    assert!(content.contains("0.3 0.3 0.3 rg"));
    assert!(content.contains("/F1 11 Tf"));
}

#[test]
fn test_no_dates_without_label_dates() {
    let output = render_sheet(&six_cell_template(), &[jpeg_label("A", 4, None)]).unwrap();
    let content = &page_contents(&output.document)[0];
    assert!(!content.contains("Tj"));
}

#[test]
fn test_date_position_in_cell() {
    // One 50x30 cell at (4, 4): date sits 30 mm left of the right edge and
    // 15 mm above the bottom edge
    let template = Template {
        columns: 1,
        rows: 1,
        ..Template::default()
    };
    let output = render_sheet(&template, &[jpeg_label("A", 1, Some("2024-03-01"))]).unwrap();
    let content = &page_contents(&output.document)[0];

    let td_line = content.lines().find(|l| l.contains("Tj")).unwrap();
    let parts: Vec<&str> = td_line.split_whitespace().collect();
    let td = parts.iter().position(|p| *p == "Td").unwrap();
    let x: f32 = parts[td - 2].parse().unwrap();
    let y: f32 = parts[td - 1].parse().unwrap();

    assert!((x - 24.0 * 2.83465).abs() < 0.01);
    assert!((y - 278.0 * 2.83465).abs() < 0.01);
}

#[test]
fn test_unparsed_date_printed_verbatim() {
    let output = render_sheet(&six_cell_template(), &[jpeg_label("A", 1, Some("soon"))]).unwrap();
    let content = &page_contents(&output.document)[0];

    assert!(content.contains("(soon) Tj"));
    assert_eq!(
        output.warnings,
        vec![RenderWarning::UnparsedDate {
            label: "A".to_string(),
            date: "soon".to_string(),
        }]
    );
}

#[test]
fn test_pdf_label_placed_as_form() {
    let output = render_sheet(&six_cell_template(), &[pdf_label("P", 2)]).unwrap();
    assert!(output.warnings.is_empty());

    let forms = output
        .document
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| s.dict.get(b"Subtype").and_then(|n| n.as_name()).ok() == Some(&b"Form"[..]))
        .count();
    assert_eq!(forms, 1);
    assert_eq!(page_contents(&output.document)[0].matches("/L0 Do").count(), 2);
}

#[test]
fn test_malformed_content_leaves_cell_blank() {
    let broken = ResolvedLabel::from_asset(
        None,
        &LabelAsset {
            name: "Broken".to_string(),
            image_data: "not-a-data-uri".to_string(),
            file_type: "image/jpeg".to_string(),
        },
        2,
        Some("2024-01-15".to_string()),
    );
    let labels = vec![broken, jpeg_label("Good", 1, None)];
    let output = render_sheet(&six_cell_template(), &labels).unwrap();

    assert_eq!(output.instance_count, 3);
    let content = &page_contents(&output.document)[0];
    assert_eq!(content.matches(" Do Q").count(), 1);
    // The date is still stamped on the blank cells
    assert_eq!(content.matches("(15.01.2024) Tj").count(), 2);

    let unusable: Vec<_> = output
        .warnings
        .iter()
        .filter(|w| matches!(w, RenderWarning::UnusableContent { .. }))
        .collect();
    assert_eq!(unusable.len(), 2);
    assert!(matches!(
        unusable[0],
        RenderWarning::UnusableContent { label, instance: 0, .. } if label == "Broken"
    ));
}

#[test]
fn test_corrupt_jpeg_does_not_abort() {
    let corrupt = LabelAsset::from_file_bytes("Corrupt", b"garbage bytes", "image/jpeg").unwrap();
    let labels = vec![
        ResolvedLabel::from_asset(None, &corrupt, 1, None),
        jpeg_label("Good", 2, None),
    ];
    let output = render_sheet(&six_cell_template(), &labels).unwrap();

    assert_eq!(output.page_count, 1);
    assert_eq!(page_contents(&output.document)[0].matches(" Do Q").count(), 2);
    assert_eq!(output.warnings.len(), 1);
    assert!(matches!(
        &output.warnings[0],
        RenderWarning::EmbedFailed { label, instance: 0, .. } if label == "Corrupt"
    ));
}

#[test]
fn test_empty_label_list_gives_empty_document() {
    let mut output = render_sheet(&six_cell_template(), &[]).unwrap();
    assert_eq!(output.page_count, 0);
    assert!(output.document.get_pages().is_empty());
    assert!(!output.to_bytes().unwrap().is_empty());
}

#[test]
fn test_instance_limit() {
    let labels = vec![jpeg_label("A", 1000, None); 6];
    assert!(matches!(
        render_sheet(&six_cell_template(), &labels),
        Err(LabelSheetError::Config(_))
    ));
}

#[test]
fn test_huge_quantities_rejected_before_expansion() {
    let labels = vec![jpeg_label("A", u32::MAX, None); 4];
    assert!(matches!(
        render_sheet(&Template::default(), &labels),
        Err(LabelSheetError::Config(_))
    ));
}

#[tokio::test]
async fn test_save_and_reload() {
    use tempfile::NamedTempFile;

    let labels = vec![jpeg_label("A", 7, Some("2024-01-15")), pdf_label("P", 1)];
    let output = render_sheet(&six_cell_template(), &labels).unwrap();
    let temp = NamedTempFile::new().unwrap();

    save_pdf(output.document, temp.path()).await.unwrap();

    let loaded = load_pdf(temp.path()).await.unwrap();
    assert_eq!(loaded.get_pages().len(), 2);
}
