//! Extraction options shared across the pipeline.

use serde::{Deserialize, Serialize};

use crate::text::OutputFormat;

/// All options controlling an extraction run.
/// Merged from config files and CLI flags by the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    // -- General --
    pub verbose: u8,

    // -- OCR --
    /// Tesseract language argument (`-l`).
    pub ocr_language: String,
    /// Magnification applied when rasterizing pages for OCR.
    pub render_scale: f32,
    /// Extra tesseract binary locations, checked before the built-in ones.
    pub tesseract_paths: Vec<String>,

    // -- Output --
    pub docx_title: String,
    pub output_suffix: String,
    /// Preselected output choice. When unset the operator is prompted.
    pub output_format: Option<OutputChoice>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            verbose: 0,
            ocr_language: "eng".to_string(),
            render_scale: 2.0,
            tesseract_paths: Vec::new(),
            docx_title: "Extracted PDF Text".to_string(),
            output_suffix: "_extracted".to_string(),
            output_format: None,
        }
    }
}

/// Which output files to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputChoice {
    Docx,
    Txt,
    Both,
}

impl OutputChoice {
    /// Parse the interactive menu answer. Anything but "1", "2" or "3" is no choice.
    pub fn from_menu(answer: &str) -> Option<Self> {
        match answer.trim() {
            "1" => Some(Self::Docx),
            "2" => Some(Self::Txt),
            "3" => Some(Self::Both),
            _ => None,
        }
    }

    /// Parse a format name as given on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "docx" | "word" => Some(Self::Docx),
            "txt" | "text" => Some(Self::Txt),
            "both" => Some(Self::Both),
            _ => None,
        }
    }

    /// Formats to write, in write order.
    pub fn formats(&self) -> &'static [OutputFormat] {
        match self {
            Self::Docx => &[OutputFormat::Docx],
            Self::Txt => &[OutputFormat::Txt],
            Self::Both => &[OutputFormat::Docx, OutputFormat::Txt],
        }
    }
}
