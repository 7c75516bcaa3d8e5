//! lopdf-built PDFs for tests.

use std::path::Path;

use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;

/// One page per entry, each drawing its string with a standard Type1 font.
/// An empty string produces a page with no text operators at all.
pub fn write_text_pdf(path: &Path, pages: &[&str]) {
    let mut doc = Document::with_version("1.5");
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let contents = pages
        .iter()
        .map(|text| {
            if text.is_empty() {
                Vec::new()
            } else {
                vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ]
            }
        })
        .map(|operations| (operations, resources_id))
        .collect();

    finish(doc, contents, path);
}

/// A document whose pages carry no text layer, like a scan without OCR.
pub fn write_blank_pdf(path: &Path, page_count: usize) {
    let pages = vec![""; page_count];
    write_text_pdf(path, &pages);
}

/// A single page showing `scan` stretched over the media box and nothing
/// else: pixels only, no fonts, no text operators.
pub fn write_image_pdf(path: &Path, scan: &RgbImage) {
    let mut doc = Document::with_version("1.5");
    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => scan.width() as i64,
            "Height" => scan.height() as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        scan.as_raw().clone(),
    ));
    let resources_id = doc.add_object(dictionary! {
        "XObject" => dictionary! {
            "Im1" => image_id,
        },
    });

    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                PAGE_WIDTH.into(),
                0.into(),
                0.into(),
                PAGE_HEIGHT.into(),
                0.into(),
                0.into(),
            ],
        ),
        Operation::new("Do", vec!["Im1".into()]),
        Operation::new("Q", vec![]),
    ];

    finish(doc, vec![(operations, resources_id)], path);
}

fn finish(mut doc: Document, pages: Vec<(Vec<Operation>, ObjectId)>, path: &Path) {
    let pages_id = doc.new_object_id();
    let page_count = pages.len() as i64;

    let kids: Vec<Object> = pages
        .into_iter()
        .map(|(operations, resources_id)| {
            add_page(&mut doc, pages_id, resources_id, operations).into()
        })
        .collect();

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).unwrap();
}

fn add_page(
    doc: &mut Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    operations: Vec<Operation>,
) -> ObjectId {
    let content = Content { operations };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));
    doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
    })
}
