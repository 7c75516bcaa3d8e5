//! Traits for the extractors and writers the pipeline drives.

use std::path::Path;

use crate::error::Result;
use crate::options::ExtractOptions;
use crate::text::{Extraction, OutputFormat};

/// Progress reporter callback type.
pub type ProgressReporter = Box<dyn Fn(f64, &str) + Send + Sync>;

/// A strategy that turns a PDF file into page-delimited text.
pub trait TextExtractor: Send + Sync {
    /// Human-readable name of this extractor.
    fn name(&self) -> &str;

    /// Extract text from the PDF at `input_path`.
    ///
    /// Never panics on bad input: library failures come back as
    /// [`Extraction::Failed`].
    fn extract(&self, input_path: &Path, options: &ExtractOptions) -> Extraction;
}

/// Output format writer: serializes extracted text to a target file.
pub trait OutputWriter: Send + Sync {
    /// Human-readable name of this writer.
    fn name(&self) -> &str;

    /// The output format this writer produces.
    fn output_format(&self) -> OutputFormat;

    /// Write `text` to `output_path`.
    fn write(&self, text: &str, output_path: &Path, options: &ExtractOptions) -> Result<()>;
}
