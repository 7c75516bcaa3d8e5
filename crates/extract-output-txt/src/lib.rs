//! TXT output: writes the extracted text as UTF-8, unchanged.

use std::path::Path;

use extract_core::error::{ExtractError, Result};
use extract_core::options::ExtractOptions;
use extract_core::plugin::OutputWriter;
use extract_core::text::OutputFormat;

pub struct TxtOutputWriter;

impl OutputWriter for TxtOutputWriter {
    fn name(&self) -> &str {
        "TXT Output"
    }

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Txt
    }

    fn write(&self, text: &str, output_path: &Path, _options: &ExtractOptions) -> Result<()> {
        log::info!("Writing TXT: {}", output_path.display());

        std::fs::write(output_path, text).map_err(|e| {
            ExtractError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write {}: {}", output_path.display(), e),
            ))
        })?;

        log::debug!("Wrote {} bytes", text.len());
        Ok(())
    }
}
