//! Extracted text intermediate representation.
//!
//! Every extractor produces an [`ExtractedText`]: page blocks in physical page
//! order, each introduced by a `--- Page N ---` header. Writers consume the
//! assembled string as-is.

use std::path::{Path, PathBuf};

use crate::error::ExtractError;

/// Where the text of a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    /// Embedded text layer read directly from the PDF.
    Direct,
    /// Recognized from rasterized page images.
    Ocr,
}

impl std::fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct => write!(f, "direct"),
            Self::Ocr => write!(f, "OCR"),
        }
    }
}

/// Page-delimited text assembled from a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    content: String,
    pages_with_text: usize,
    source: ExtractionSource,
}

impl ExtractedText {
    pub fn new(source: ExtractionSource) -> Self {
        Self {
            content: String::new(),
            pages_with_text: 0,
            source,
        }
    }

    /// Append one page. Blank pages contribute nothing.
    /// Returns whether the page was kept.
    pub fn push_page(&mut self, page_number: u32, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        self.content.push('\n');
        self.content.push_str(&page_header(page_number));
        self.content.push('\n');
        self.content.push_str(text);
        self.content.push('\n');
        self.pages_with_text += 1;
        true
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn into_string(self) -> String {
        self.content
    }

    pub fn source(&self) -> ExtractionSource {
        self.source
    }

    pub fn pages_with_text(&self) -> usize {
        self.pages_with_text
    }

    /// Character count as shown to the operator (Unicode scalar values).
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }

    /// Convert to the tri-state result: blank text becomes [`Extraction::Empty`].
    pub fn finish(self) -> Extraction {
        if self.is_blank() {
            Extraction::Empty
        } else {
            Extraction::Text(self)
        }
    }
}

/// The literal header placed before each page's text.
pub fn page_header(page_number: u32) -> String {
    format!("--- Page {} ---", page_number)
}

/// Outcome of one extraction attempt.
#[derive(Debug)]
pub enum Extraction {
    /// At least one page produced non-whitespace text.
    Text(ExtractedText),
    /// The document was read but no page carried usable text.
    Empty,
    /// The attempt failed before any text could be assembled.
    Failed(ExtractError),
}

impl Extraction {
    pub fn into_text(self) -> Option<ExtractedText> {
        match self {
            Self::Text(text) => Some(text),
            Self::Empty | Self::Failed(_) => None,
        }
    }
}

/// Output file formats the tool can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Docx,
    Txt,
}

impl OutputFormat {
    /// Get the canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }

    /// Output path next to `input`: `<stem><suffix>.<ext>`.
    pub fn output_path(&self, input: &Path, suffix: &str) -> PathBuf {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        input.with_file_name(format!("{}{}.{}", stem, suffix, self.extension()))
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}
