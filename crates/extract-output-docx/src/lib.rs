//! DOCX output: a title heading followed by one paragraph per text line.

mod document;
mod writer;

use std::path::Path;

use extract_core::error::Result;
use extract_core::options::ExtractOptions;
use extract_core::plugin::OutputWriter;
use extract_core::text::OutputFormat;

pub use document::DocxDocument;
pub use writer::write_docx;

pub struct DocxOutputWriter;

impl OutputWriter for DocxOutputWriter {
    fn name(&self) -> &str {
        "DOCX Output"
    }

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    fn write(&self, text: &str, output_path: &Path, options: &ExtractOptions) -> Result<()> {
        log::info!("Writing DOCX: {}", output_path.display());
        let document = DocxDocument::from_text(&options.docx_title, text);
        writer::write_docx(&document, output_path)
    }
}
