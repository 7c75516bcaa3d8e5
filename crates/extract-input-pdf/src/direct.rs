//! Direct extraction: read the embedded text layer page by page.

use std::path::Path;

use extract_core::options::ExtractOptions;
use extract_core::plugin::TextExtractor;
use extract_core::text::{ExtractedText, Extraction, ExtractionSource};

use crate::backend::{LopdfOpener, PdfOpener};

pub struct DirectTextExtractor {
    opener: Box<dyn PdfOpener>,
}

impl DirectTextExtractor {
    pub fn new(opener: Box<dyn PdfOpener>) -> Self {
        Self { opener }
    }
}

impl Default for DirectTextExtractor {
    fn default() -> Self {
        Self::new(Box::new(LopdfOpener))
    }
}

impl TextExtractor for DirectTextExtractor {
    fn name(&self) -> &str {
        "Direct Text"
    }

    fn extract(&self, input_path: &Path, _options: &ExtractOptions) -> Extraction {
        let doc = match self.opener.open(input_path) {
            Ok(doc) => doc,
            Err(e) => {
                log::error!("Error in simple extraction: {}", e);
                return Extraction::Failed(e);
            }
        };

        let mut text = ExtractedText::new(ExtractionSource::Direct);
        for page_number in 1..=doc.page_count() {
            match doc.page_text(page_number) {
                Ok(page_text) => {
                    if !text.push_page(page_number, &page_text) {
                        log::debug!("Page {}: no embedded text", page_number);
                    }
                }
                Err(e) => {
                    log::error!("Error in simple extraction: {}", e);
                    return Extraction::Failed(e);
                }
            }
        }

        log::debug!(
            "Direct extraction: {} of {} pages carried text",
            text.pages_with_text(),
            doc.page_count()
        );
        text.finish()
    }
}
