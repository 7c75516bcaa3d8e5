//! PDF input: direct text-layer extraction and the OCR fallback.

mod backend;
mod direct;
mod ocr;
mod render;
mod tesseract;

#[cfg(test)]
mod fixtures;

pub use backend::{LopdfOpener, OcrEngine, PageRasterizer, PdfDocument, PdfOpener};
pub use direct::DirectTextExtractor;
pub use ocr::OcrExtractor;
pub use render::{check_pdftoppm, scale_to_dpi, PdftoppmRasterizer};
pub use tesseract::{
    expand_env_vars, locate_tesseract, TesseractBinary, TesseractEngine,
    DEFAULT_TESSERACT_PATHS, INSTALL_HINT,
};
