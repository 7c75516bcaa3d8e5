//! In-memory model of the generated document.

use extract_utils::xml::strip_invalid_xml_chars;

/// A heading plus body paragraphs, already cleaned for XML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocxDocument {
    title: String,
    paragraphs: Vec<String>,
}

impl DocxDocument {
    pub fn new(title: &str) -> Self {
        Self {
            title: strip_invalid_xml_chars(title),
            paragraphs: Vec::new(),
        }
    }

    /// One paragraph per line of `text`; whitespace-only lines are dropped.
    pub fn from_text(title: &str, text: &str) -> Self {
        let mut doc = Self::new(title);
        for line in text.lines() {
            doc.push_paragraph(line);
        }
        doc
    }

    /// Returns false when the line was blank and nothing was added.
    pub fn push_paragraph(&mut self, line: &str) -> bool {
        let cleaned = strip_invalid_xml_chars(line);
        if cleaned.trim().is_empty() {
            return false;
        }
        self.paragraphs.push(cleaned);
        true
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn paragraphs(&self) -> &[String] {
        &self.paragraphs
    }
}
