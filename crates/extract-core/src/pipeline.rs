//! Pipeline orchestrator: runs one extraction from input path to output files.
//!
//! The run is a small state machine:
//!   ResolveInput → TryDirect → Save
//!                            ↘ CheckOcr → TryOcr → Save
//! Every failure state is terminal and leaves no output behind.

use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::error::{ExtractError, Result};
use crate::options::{ExtractOptions, OutputChoice};
use crate::plugin::{OutputWriter, ProgressReporter, TextExtractor};
use crate::prompt::{clean_path_answer, Prompt};
use crate::text::{ExtractedText, Extraction, ExtractionSource};

const INPUT_QUESTION: &str = "Enter the path to your PDF file: ";

const FORMAT_QUESTION: &str = "\nChoose output format:\n\
1. Word document (.docx)\n\
2. Plain text file (.txt)\n\
3. Both\n\
Enter your choice (1-3): ";

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub input: PathBuf,
    pub source: ExtractionSource,
    pub characters: usize,
    pub pages_with_text: usize,
    pub written: Vec<PathBuf>,
}

#[derive(Debug)]
enum Stage {
    ResolveInput(Option<PathBuf>),
    TryDirect(PathBuf),
    CheckOcr(PathBuf),
    TryOcr(PathBuf),
    Save(PathBuf, ExtractedText),
}

/// The extraction pipeline orchestrator.
pub struct Pipeline {
    direct: Box<dyn TextExtractor>,
    ocr: Option<Box<dyn TextExtractor>>,
    writers: Vec<Box<dyn OutputWriter>>,
    progress_reporter: Option<ProgressReporter>,
}

impl Pipeline {
    pub fn new(direct: Box<dyn TextExtractor>) -> Self {
        Self {
            direct,
            ocr: None,
            writers: Vec::new(),
            progress_reporter: None,
        }
    }

    /// Enable OCR fallback. Without it, a PDF lacking a text layer aborts the run.
    pub fn set_ocr(&mut self, ocr: Box<dyn TextExtractor>) {
        self.ocr = Some(ocr);
    }

    /// Register a writer. One writer per output format; later ones win.
    pub fn add_writer(&mut self, writer: Box<dyn OutputWriter>) {
        self.writers
            .retain(|w| w.output_format() != writer.output_format());
        self.writers.push(writer);
    }

    /// Set a progress reporter callback.
    pub fn set_progress_reporter(&mut self, reporter: ProgressReporter) {
        self.progress_reporter = Some(reporter);
    }

    pub fn ocr_available(&self) -> bool {
        self.ocr.is_some()
    }

    /// Run the full pipeline.
    ///
    /// `input` is the path given on the command line, if any; otherwise the
    /// operator is asked for one through `prompt`.
    pub fn run(
        &self,
        input: Option<&Path>,
        options: &ExtractOptions,
        prompt: &mut dyn Prompt,
    ) -> Result<RunSummary> {
        self.report_progress(0.0, "Starting extraction...");

        let mut stage = Stage::ResolveInput(input.map(Path::to_path_buf));
        loop {
            stage = match stage {
                Stage::ResolveInput(arg) => Stage::TryDirect(self.resolve_input(arg, prompt)?),
                Stage::TryDirect(path) => {
                    info!("🔍 Attempting simple text extraction...");
                    self.report_progress(0.1, &format!("Running {}", self.direct.name()));
                    match self.direct.extract(&path, options) {
                        Extraction::Text(text) => {
                            info!("✓ Simple extraction successful!");
                            Stage::Save(path, text)
                        }
                        Extraction::Empty => {
                            warn!("⚠ Simple extraction returned no text.");
                            Stage::CheckOcr(path)
                        }
                        Extraction::Failed(e) => {
                            warn!("⚠ Simple extraction failed: {}", e);
                            Stage::CheckOcr(path)
                        }
                    }
                }
                Stage::CheckOcr(path) => {
                    if !self.ocr_available() {
                        return Err(ExtractError::OcrUnavailable);
                    }
                    Stage::TryOcr(path)
                }
                Stage::TryOcr(path) => {
                    let ocr = self.ocr.as_ref().ok_or(ExtractError::OcrUnavailable)?;
                    info!("🔍 Attempting OCR extraction...");
                    self.report_progress(0.3, &format!("Running {}", ocr.name()));
                    match ocr.extract(&path, options) {
                        Extraction::Text(text) => Stage::Save(path, text),
                        Extraction::Empty => return Err(ExtractError::NoTextExtracted),
                        Extraction::Failed(e) => {
                            error!("Error processing PDF: {}", e);
                            return Err(ExtractError::NoTextExtracted);
                        }
                    }
                }
                Stage::Save(path, text) => return self.save(&path, text, options, prompt),
            };
        }
    }

    fn resolve_input(&self, arg: Option<PathBuf>, prompt: &mut dyn Prompt) -> Result<PathBuf> {
        let path = match arg {
            Some(path) => path,
            None => PathBuf::from(clean_path_answer(&prompt.ask(INPUT_QUESTION)?)),
        };

        if !path.exists() {
            return Err(ExtractError::InputNotFound(path));
        }

        info!("📄 Processing: {}", path.display());
        Ok(path)
    }

    fn save(
        &self,
        input: &Path,
        text: ExtractedText,
        options: &ExtractOptions,
        prompt: &mut dyn Prompt,
    ) -> Result<RunSummary> {
        let characters = text.char_count();
        info!("📊 Extracted {} characters", characters);
        self.report_progress(0.8, "Saving output");

        let choice = match options.output_format {
            Some(choice) => Some(choice),
            None => {
                let answer = prompt.ask(FORMAT_QUESTION)?;
                let choice = OutputChoice::from_menu(&answer);
                if choice.is_none() {
                    warn!("Unrecognized choice '{}'", answer.trim());
                }
                choice
            }
        };

        let mut written = Vec::new();
        let formats = choice.map(|c| c.formats()).unwrap_or_default();
        for format in formats {
            let target = format.output_path(input, &options.output_suffix);
            let Some(writer) = self.writers.iter().find(|w| w.output_format() == *format) else {
                error!("✗ No writer registered for {}", format);
                continue;
            };

            match writer.write(text.as_str(), &target, options) {
                Ok(()) => {
                    info!("✓ Text saved to: {}", target.display());
                    written.push(target);
                }
                Err(e) => {
                    error!("✗ Error saving {}: {}", writer.name(), e);
                }
            }
        }

        if written.is_empty() {
            return Err(ExtractError::NothingSaved);
        }

        self.report_progress(1.0, "Extraction complete");
        Ok(RunSummary {
            input: input.to_path_buf(),
            source: text.source(),
            characters,
            pages_with_text: text.pages_with_text(),
            written,
        })
    }

    fn report_progress(&self, fraction: f64, message: &str) {
        if let Some(ref reporter) = self.progress_reporter {
            reporter(fraction, message);
        }
    }
}

/// Builder for assembling a pipeline.
pub struct PipelineBuilder {
    direct: Option<Box<dyn TextExtractor>>,
    ocr: Option<Box<dyn TextExtractor>>,
    writers: Vec<Box<dyn OutputWriter>>,
    progress_reporter: Option<ProgressReporter>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self {
            direct: None,
            ocr: None,
            writers: Vec::new(),
            progress_reporter: None,
        }
    }

    pub fn direct(mut self, extractor: Box<dyn TextExtractor>) -> Self {
        self.direct = Some(extractor);
        self
    }

    pub fn ocr(mut self, extractor: Option<Box<dyn TextExtractor>>) -> Self {
        self.ocr = extractor;
        self
    }

    pub fn writer(mut self, writer: Box<dyn OutputWriter>) -> Self {
        self.writers.push(writer);
        self
    }

    pub fn progress_reporter(mut self, reporter: ProgressReporter) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let direct = self
            .direct
            .ok_or_else(|| ExtractError::Other("No direct extractor specified".to_string()))?;

        let mut pipeline = Pipeline::new(direct);
        if let Some(ocr) = self.ocr {
            pipeline.set_ocr(ocr);
        }
        for w in self.writers {
            pipeline.add_writer(w);
        }
        if let Some(reporter) = self.progress_reporter {
            pipeline.set_progress_reporter(reporter);
        }
        Ok(pipeline)
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
