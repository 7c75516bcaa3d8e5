//! OCR extraction: rasterize each page and recognize it.

use std::path::Path;

use extract_core::error::Result;
use extract_core::options::ExtractOptions;
use extract_core::plugin::TextExtractor;
use extract_core::text::{ExtractedText, Extraction, ExtractionSource};

use crate::backend::{LopdfOpener, OcrEngine, PageRasterizer, PdfOpener};
use crate::render::PdftoppmRasterizer;
use crate::tesseract::{TesseractBinary, TesseractEngine};

pub struct OcrExtractor {
    opener: Box<dyn PdfOpener>,
    rasterizer: Box<dyn PageRasterizer>,
    engine: Box<dyn OcrEngine>,
}

impl OcrExtractor {
    pub fn new(
        opener: Box<dyn PdfOpener>,
        rasterizer: Box<dyn PageRasterizer>,
        engine: Box<dyn OcrEngine>,
    ) -> Self {
        Self {
            opener,
            rasterizer,
            engine,
        }
    }

    /// lopdf for page counts, pdftoppm for rendering, and the given tesseract.
    pub fn with_tesseract(binary: TesseractBinary) -> Self {
        Self::new(
            Box::new(LopdfOpener),
            Box::new(PdftoppmRasterizer),
            Box::new(TesseractEngine::new(binary)),
        )
    }

    fn ocr_page(
        &self,
        input_path: &Path,
        page_number: u32,
        options: &ExtractOptions,
    ) -> Result<String> {
        let image = self
            .rasterizer
            .render(input_path, page_number, options.render_scale)?;
        self.engine.recognize(&image, &options.ocr_language)
    }
}

impl TextExtractor for OcrExtractor {
    fn name(&self) -> &str {
        "OCR"
    }

    fn extract(&self, input_path: &Path, options: &ExtractOptions) -> Extraction {
        let doc = match self.opener.open(input_path) {
            Ok(doc) => doc,
            Err(e) => {
                log::error!("Error in OCR extraction: {}", e);
                return Extraction::Failed(e);
            }
        };

        let page_count = doc.page_count();
        log::info!("Processing {} pages with OCR...", page_count);
        log::debug!(
            "OCR engine: {}, language: {}, scale: {}",
            self.engine.name(),
            options.ocr_language,
            options.render_scale
        );

        let mut text = ExtractedText::new(ExtractionSource::Ocr);
        for page_number in 1..=page_count {
            match self.ocr_page(input_path, page_number, options) {
                Ok(page_text) => {
                    if text.push_page(page_number, &page_text) {
                        log::info!("✓ Extracted text from page {}", page_number);
                    } else {
                        log::warn!("⚠ Page {} contains no readable text", page_number);
                    }
                }
                Err(e) => log::error!("✗ Error processing page {}: {}", page_number, e),
            }
        }

        text.finish()
    }
}
