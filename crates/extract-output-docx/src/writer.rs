//! DOCX writer: assembles a minimal WordprocessingML package.

use std::path::Path;

use extract_core::error::{ExtractError, Result};
use extract_utils::archive::ZipBuilder;
use extract_utils::xml::XmlBuilder;

use crate::document::DocxDocument;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

const REL_OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_STYLES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";

/// Write `document` as a `.docx` package at `output_path`.
///
/// The package is assembled in a temporary file next to the target and
/// renamed into place, so a failed write never leaves a partial `.docx`.
pub fn write_docx(document: &DocxDocument, output_path: &Path) -> Result<()> {
    let dir = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let staging = tempfile::Builder::new()
        .prefix(".docx-")
        .tempfile_in(dir)
        .map_err(|e| ExtractError::Docx(format!("Failed to create DOCX: {}", e)))?;
    let file = staging
        .reopen()
        .map_err(|e| ExtractError::Docx(format!("Failed to create DOCX: {}", e)))?;
    let mut zip = ZipBuilder::from_file(file);

    let parts = [
        ("[Content_Types].xml", generate_content_types()),
        ("_rels/.rels", generate_package_rels()),
        ("word/document.xml", generate_document_xml(document)),
        ("word/styles.xml", generate_styles_xml()),
        ("word/_rels/document.xml.rels", generate_document_rels()),
    ];

    for (name, xml) in &parts {
        zip.add_file(name, xml.as_bytes())
            .map_err(|e| ExtractError::Docx(format!("Failed to write {}: {}", name, e)))?;
    }

    zip.finish()
        .map_err(|e| ExtractError::Docx(format!("Failed to finalize DOCX: {}", e)))?;
    staging
        .persist(output_path)
        .map_err(|e| ExtractError::Docx(format!("Failed to save DOCX: {}", e.error)))?;

    log::debug!(
        "DOCX written with {} paragraphs: {}",
        document.paragraphs().len(),
        output_path.display()
    );
    Ok(())
}

fn generate_content_types() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag("Types", &[("xmlns", NS_CONTENT_TYPES)])
        .empty_tag("Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])
        .empty_tag(
            "Default",
            &[("Extension", "xml"), ("ContentType", "application/xml")],
        )
        .empty_tag(
            "Override",
            &[("PartName", "/word/document.xml"), ("ContentType", CT_DOCUMENT)],
        )
        .empty_tag(
            "Override",
            &[("PartName", "/word/styles.xml"), ("ContentType", CT_STYLES)],
        )
        .close_tag("Types");
    xml.build()
}

fn generate_package_rels() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag("Relationships", &[("xmlns", NS_PKG_REL)])
        .empty_tag(
            "Relationship",
            &[
                ("Id", "rId1"),
                ("Type", REL_OFFICE_DOCUMENT),
                ("Target", "word/document.xml"),
            ],
        )
        .close_tag("Relationships");
    xml.build()
}

fn generate_document_rels() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag("Relationships", &[("xmlns", NS_PKG_REL)])
        .empty_tag(
            "Relationship",
            &[("Id", "rId1"), ("Type", REL_STYLES), ("Target", "styles.xml")],
        )
        .close_tag("Relationships");
    xml.build()
}

fn generate_document_xml(document: &DocxDocument) -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag("w:document", &[("xmlns:w", NS_MAIN), ("xmlns:r", NS_REL)])
        .open_tag("w:body", &[]);

    write_paragraph(&mut xml, document.title(), Some("Title"));
    for paragraph in document.paragraphs() {
        write_paragraph(&mut xml, paragraph, None);
    }

    // US Letter, one inch margins
    xml.open_tag("w:sectPr", &[])
        .empty_tag("w:pgSz", &[("w:w", "12240"), ("w:h", "15840")])
        .empty_tag(
            "w:pgMar",
            &[
                ("w:top", "1440"),
                ("w:right", "1440"),
                ("w:bottom", "1440"),
                ("w:left", "1440"),
                ("w:header", "720"),
                ("w:footer", "720"),
                ("w:gutter", "0"),
            ],
        )
        .close_tag("w:sectPr");

    xml.close_tag("w:body").close_tag("w:document");
    xml.build()
}

fn write_paragraph(xml: &mut XmlBuilder, text: &str, style: Option<&str>) {
    xml.open_tag("w:p", &[]);
    if let Some(style) = style {
        xml.open_tag("w:pPr", &[])
            .empty_tag("w:pStyle", &[("w:val", style)])
            .close_tag("w:pPr");
    }
    xml.open_tag("w:r", &[])
        .text_element("w:t", text, &[("xml:space", "preserve")])
        .close_tag("w:r")
        .close_tag("w:p");
}

fn generate_styles_xml() -> String {
    let mut xml = XmlBuilder::new();
    xml.open_tag("w:styles", &[("xmlns:w", NS_MAIN)]);

    xml.open_tag(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )
    .empty_tag("w:name", &[("w:val", "Normal")])
    .open_tag("w:pPr", &[])
    .empty_tag("w:spacing", &[("w:after", "160"), ("w:line", "259"), ("w:lineRule", "auto")])
    .close_tag("w:pPr")
    .open_tag("w:rPr", &[])
    .empty_tag("w:sz", &[("w:val", "22")])
    .close_tag("w:rPr")
    .close_tag("w:style");

    xml.open_tag("w:style", &[("w:type", "paragraph"), ("w:styleId", "Title")])
        .empty_tag("w:name", &[("w:val", "Title")])
        .empty_tag("w:basedOn", &[("w:val", "Normal")])
        .empty_tag("w:next", &[("w:val", "Normal")])
        .empty_tag("w:qFormat", &[])
        .open_tag("w:pPr", &[])
        .empty_tag("w:spacing", &[("w:after", "0"), ("w:line", "240"), ("w:lineRule", "auto")])
        .empty_tag("w:contextualSpacing", &[])
        .close_tag("w:pPr")
        .open_tag("w:rPr", &[])
        .empty_tag("w:kern", &[("w:val", "28")])
        .empty_tag("w:sz", &[("w:val", "56")])
        .close_tag("w:rPr")
        .close_tag("w:style");

    xml.close_tag("w:styles");
    xml.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use extract_utils::archive::{list_zip_entries, read_zip_entry};
    use extract_utils::xml::extract_text;

    fn document_text(path: &Path) -> Vec<String> {
        let xml = read_zip_entry(path, "word/document.xml").unwrap();
        extract_text(&String::from_utf8(xml).unwrap(), "t")
    }

    #[test]
    fn test_package_parts() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.docx");
        write_docx(&DocxDocument::from_text("Extracted PDF Text", "x"), &path).unwrap();

        let entries = list_zip_entries(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                "[Content_Types].xml",
                "_rels/.rels",
                "word/document.xml",
                "word/styles.xml",
                "word/_rels/document.xml.rels",
            ]
        );
    }

    #[test]
    fn test_title_then_paragraphs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.docx");
        let doc = DocxDocument::from_text("Extracted PDF Text", "Hello\n\nWorld & <more>");
        write_docx(&doc, &path).unwrap();

        assert_eq!(
            document_text(&path),
            vec!["Extracted PDF Text", "Hello", "World & <more>"]
        );
    }

    #[test]
    fn test_title_uses_title_style() {
        let xml = generate_document_xml(&DocxDocument::from_text("Heading", "body"));
        let style = xml.find("<w:pStyle w:val=\"Title\"/>").unwrap();
        let heading = xml.find("Heading").unwrap();
        let body = xml.find(">body<").unwrap();
        assert!(style < heading && heading < body);
        assert_eq!(xml.matches("<w:pStyle").count(), 1);
    }

    #[test]
    fn test_styles_define_title() {
        let xml = generate_styles_xml();
        assert!(xml.contains("w:styleId=\"Title\""));
        assert!(xml.contains("w:styleId=\"Normal\""));
    }

    #[test]
    fn test_content_types_cover_parts() {
        let xml = generate_content_types();
        assert!(xml.contains("PartName=\"/word/document.xml\""));
        assert!(xml.contains("PartName=\"/word/styles.xml\""));
        assert!(xml.contains("Extension=\"rels\""));
    }

    #[test]
    fn test_replaces_existing_file_without_leftovers() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.docx");
        std::fs::write(&path, b"stale bytes").unwrap();

        write_docx(&DocxDocument::from_text("T", "fresh"), &path).unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.docx"]);
        assert_eq!(document_text(&path), vec!["T", "fresh"]);
    }

    #[test]
    fn test_failed_write_leaves_nothing_behind() {
        let dir = tempfile::TempDir::new().unwrap();
        // a directory squatting on the target makes the final rename fail
        let path = dir.path().join("out.docx");
        std::fs::create_dir(&path).unwrap();

        let err = write_docx(&DocxDocument::from_text("T", "body"), &path).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));

        let names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["out.docx"]);
        assert!(path.is_dir());
    }

    #[test]
    fn test_unwritable_path_is_docx_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.docx");
        let err = write_docx(&DocxDocument::new("T"), &path).unwrap_err();
        assert!(matches!(err, ExtractError::Docx(_)));
    }
}
