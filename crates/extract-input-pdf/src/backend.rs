//! Seams around the external capabilities: PDF access, rasterization, OCR.

use std::path::Path;

use image::DynamicImage;
use lopdf::Document;

use extract_core::error::{ExtractError, Result};

/// An open PDF document.
pub trait PdfDocument {
    /// Number of pages; pages are numbered `1..=page_count()`.
    fn page_count(&self) -> u32;

    /// Embedded text layer of one page.
    fn page_text(&self, page_number: u32) -> Result<String>;
}

/// Opens PDF files.
pub trait PdfOpener: Send + Sync {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>>;
}

/// Renders a single PDF page into an image buffer.
pub trait PageRasterizer: Send + Sync {
    /// Render `page_number` (1-based) at `scale` times its natural size.
    fn render(&self, pdf_path: &Path, page_number: u32, scale: f32) -> Result<DynamicImage>;
}

/// Recognizes text in an image.
pub trait OcrEngine: Send + Sync {
    fn name(&self) -> &str;

    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String>;
}

/// lopdf-backed document access.
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfOpener;

impl PdfOpener for LopdfOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn PdfDocument>> {
        let doc = Document::load(path)
            .map_err(|e| ExtractError::Pdf(format!("Failed to load PDF: {}", e)))?;
        Ok(Box::new(LopdfDocument::new(doc)))
    }
}

pub struct LopdfDocument {
    doc: Document,
    page_numbers: Vec<u32>,
}

impl LopdfDocument {
    pub fn new(doc: Document) -> Self {
        // BTreeMap keys, already ascending
        let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
        log::debug!("PDF has {} pages", page_numbers.len());
        Self { doc, page_numbers }
    }
}

impl PdfDocument for LopdfDocument {
    fn page_count(&self) -> u32 {
        self.page_numbers.len() as u32
    }

    fn page_text(&self, page_number: u32) -> Result<String> {
        if !self.page_numbers.contains(&page_number) {
            return Err(ExtractError::Pdf(format!(
                "Page {} out of range (document has {})",
                page_number,
                self.page_numbers.len()
            )));
        }
        self.doc
            .extract_text(&[page_number])
            .map_err(|e| ExtractError::Pdf(format!("Page {}: {}", page_number, e)))
    }
}
