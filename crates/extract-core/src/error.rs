use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("DOCX error: {0}")]
    Docx(String),

    #[error("Invalid config: {0}")]
    Config(String),

    #[error("File '{}' not found!", .0.display())]
    InputNotFound(PathBuf),

    #[error("Cannot perform OCR without Tesseract. Please install it first.")]
    OcrUnavailable,

    #[error("Failed to extract any text from PDF!")]
    NoTextExtracted,

    #[error("Failed to save extracted text!")]
    NothingSaved,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
