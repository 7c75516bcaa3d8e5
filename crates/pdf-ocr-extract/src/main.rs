//! pdf-ocr-extract: pull text out of a PDF, falling back to OCR for scans.
//!
//! `pdf-ocr-extract [INPUT] [--format docx|txt|both] [--lang eng] [-v]`
//!
//! Without INPUT the path is asked for interactively, and without `--format`
//! (or `output_format` in a config file) the output menu is shown.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;

use extract_core::error::ExtractError;
use extract_core::options::{ExtractOptions, OutputChoice};
use extract_core::pipeline::{PipelineBuilder, RunSummary};
use extract_core::plugin::TextExtractor;
use extract_core::prompt::StdinPrompt;
use extract_input_pdf::{DirectTextExtractor, OcrExtractor, TesseractBinary, INSTALL_HINT};
use extract_output_docx::DocxOutputWriter;
use extract_output_txt::TxtOutputWriter;

const APP_NAME: &str = "pdf-ocr-extract";
const LOCAL_CONFIG: &str = ".pdf-ocr-extract.toml";

#[derive(Parser, Debug)]
#[command(
    name = "pdf-ocr-extract",
    version,
    about = "Extract text from PDFs, using OCR when there is no text layer"
)]
struct Cli {
    /// PDF to read (asked for when omitted)
    input: Option<PathBuf>,

    /// Output format: docx, txt or both (skips the menu)
    #[arg(short, long, value_parser = parse_output_choice)]
    format: Option<OutputChoice>,

    /// Tesseract language, e.g. eng or deu+eng
    #[arg(short, long)]
    lang: Option<String>,

    /// Page rasterization scale for OCR (1.0 = 72 DPI)
    #[arg(long)]
    scale: Option<f32>,

    /// Extra tesseract binary to try before the usual install locations
    #[arg(long, value_name = "PATH")]
    tesseract: Option<String>,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Dump effective merged config as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

fn parse_output_choice(s: &str) -> std::result::Result<OutputChoice, String> {
    OutputChoice::from_name(s).ok_or_else(|| format!("unknown format '{}' (docx, txt, both)", s))
}

/// Load config from global and project-local TOML files.
/// Missing files are silently ignored; parse failures are returned as
/// warnings to log once the logger is up.
fn load_config() -> (ExtractOptions, Vec<String>) {
    let global = dirs::config_dir().map(|dir| dir.join(APP_NAME).join("config.toml"));
    load_config_from(global.as_deref(), Path::new(LOCAL_CONFIG))
}

fn load_config_from(global: Option<&Path>, local: &Path) -> (ExtractOptions, Vec<String>) {
    let mut opts = ExtractOptions::default();
    let mut warnings = Vec::new();

    for path in global.into_iter().chain(std::iter::once(local)) {
        let Ok(contents) = std::fs::read_to_string(path) else {
            continue;
        };
        match toml::from_str::<ExtractOptions>(&contents) {
            Ok(parsed) => merge_config(&mut opts, parsed),
            Err(e) => warnings.push(
                ExtractError::Config(format!("Failed to parse {}: {}", path.display(), e))
                    .to_string(),
            ),
        }
    }

    if !valid_scale(opts.render_scale) {
        warnings.push(
            ExtractError::Config(format!(
                "render_scale must be a positive number, got {}; using {}",
                opts.render_scale,
                ExtractOptions::default().render_scale
            ))
            .to_string(),
        );
        opts.render_scale = ExtractOptions::default().render_scale;
    }

    (opts, warnings)
}

fn valid_scale(scale: f32) -> bool {
    scale.is_finite() && scale > 0.0
}

/// `serde(default)` fills every missing key, so a later file replaces the
/// earlier one wholesale.
fn merge_config(base: &mut ExtractOptions, from: ExtractOptions) {
    *base = from;
}

/// Apply CLI flags on top of config-loaded options.
/// Only overrides when the CLI flag was explicitly provided.
fn apply_cli_overrides(opts: &mut ExtractOptions, cli: &Cli) {
    if cli.verbose > 0 {
        opts.verbose = cli.verbose;
    }
    if let Some(choice) = cli.format {
        opts.output_format = Some(choice);
    }
    if let Some(ref lang) = cli.lang {
        opts.ocr_language = lang.clone();
    }
    if let Some(scale) = cli.scale {
        if valid_scale(scale) {
            opts.render_scale = scale;
        }
    }
    if let Some(ref path) = cli.tesseract {
        opts.tesseract_paths.insert(0, path.clone());
    }
}

fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn main() {
    let cli = Cli::parse();

    let (mut options, warnings) = load_config();
    apply_cli_overrides(&mut options, &cli);

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_filter(options.verbose)),
    )
    .init();
    for warning in &warnings {
        log::warn!("{}", warning);
    }

    if cli.dump_config {
        match toml::to_string_pretty(&options) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("Error serializing config: {}", e),
        }
        return;
    }

    println!("Advanced PDF Text Extractor with OCR");
    println!("{}", "=".repeat(50));

    match run(cli.input.as_deref(), &options) {
        Ok(summary) => print_summary(&summary),
        Err(e) => println!("✗ {:#}", e),
    }
}

fn run(input: Option<&Path>, options: &ExtractOptions) -> Result<RunSummary> {
    let ocr = select_ocr(
        extract_input_pdf::locate_tesseract(&options.tesseract_paths),
        extract_input_pdf::check_pdftoppm(),
    );

    let pipeline = PipelineBuilder::new()
        .direct(Box::new(DirectTextExtractor::default()))
        .ocr(ocr)
        .writer(Box::new(DocxOutputWriter))
        .writer(Box::new(TxtOutputWriter))
        .progress_reporter(Box::new(|frac, msg| {
            log::debug!("[{:3.0}%] {}", frac * 100.0, msg);
        }))
        .build()?;

    let summary = pipeline.run(input, options, &mut StdinPrompt)?;
    Ok(summary)
}

/// OCR needs both tesseract and pdftoppm; without either the run is
/// direct-only and aborts with "Cannot perform OCR" when that fails.
fn select_ocr(
    tesseract: Option<TesseractBinary>,
    pdftoppm: extract_core::error::Result<()>,
) -> Option<Box<dyn TextExtractor>> {
    let Some(binary) = tesseract else {
        println!("⚠ Warning: Tesseract OCR not found!");
        println!("Please install Tesseract from: {}", INSTALL_HINT);
        println!("The program will try simple extraction only.\n");
        return None;
    };
    if let Err(e) = pdftoppm {
        println!("⚠ Warning: {}", e);
        println!("The program will try simple extraction only.\n");
        return None;
    }
    Some(Box::new(OcrExtractor::with_tesseract(binary)))
}

fn print_summary(summary: &RunSummary) {
    println!("\n🎉 Extraction completed successfully!");
    println!("📈 Total characters extracted: {}", summary.characters);
    log::debug!(
        "{} via {} extraction, {} pages with text, {} file(s) written",
        summary.input.display(),
        summary.source,
        summary.pages_with_text,
        summary.written.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("pdf-ocr-extract").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_cli_defaults() {
        let cli = parse(&[]);
        assert!(cli.input.is_none());
        assert!(cli.format.is_none());
        assert_eq!(cli.verbose, 0);
        assert!(!cli.dump_config);
    }

    #[test]
    fn test_cli_flags() {
        let cli = parse(&["scan.pdf", "-f", "both", "-l", "deu", "--scale", "3", "-vv"]);
        assert_eq!(cli.input.as_deref(), Some(Path::new("scan.pdf")));
        assert_eq!(cli.format, Some(OutputChoice::Both));
        assert_eq!(cli.lang.as_deref(), Some("deu"));
        assert_eq!(cli.scale, Some(3.0));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        let result = Cli::try_parse_from(["pdf-ocr-extract", "--format", "pdf"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_only_when_given() {
        let mut opts = ExtractOptions {
            ocr_language: "fra".to_string(),
            verbose: 1,
            tesseract_paths: vec!["/opt/tess".to_string()],
            ..Default::default()
        };
        apply_cli_overrides(&mut opts, &parse(&[]));
        assert_eq!(opts.ocr_language, "fra");
        assert_eq!(opts.verbose, 1);

        apply_cli_overrides(&mut opts, &parse(&["-l", "eng", "--tesseract", "/tmp/t", "-f", "txt"]));
        assert_eq!(opts.ocr_language, "eng");
        assert_eq!(opts.tesseract_paths, vec!["/tmp/t", "/opt/tess"]);
        assert_eq!(opts.output_format, Some(OutputChoice::Txt));
    }

    #[test]
    fn test_nonpositive_scale_ignored() {
        let mut opts = ExtractOptions::default();
        apply_cli_overrides(&mut opts, &parse(&["--scale", "0"]));
        assert_eq!(opts.render_scale, 2.0);
    }

    #[test]
    fn test_local_config_overrides_global() {
        let dir = tempfile::TempDir::new().unwrap();
        let global = dir.path().join("config.toml");
        let local = dir.path().join(".pdf-ocr-extract.toml");
        std::fs::write(&global, "ocr_language = \"deu\"\nrender_scale = 3.0\n").unwrap();
        std::fs::write(&local, "output_format = \"both\"\n").unwrap();

        let (opts, warnings) = load_config_from(Some(&global), &local);
        assert!(warnings.is_empty());
        assert_eq!(opts.output_format, Some(OutputChoice::Both));
        // full override: global keys fall back to defaults
        assert_eq!(opts.ocr_language, "eng");
        assert_eq!(opts.render_scale, 2.0);
    }

    #[test]
    fn test_missing_config_files_use_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let (opts, warnings) =
            load_config_from(Some(&dir.path().join("nope.toml")), &dir.path().join("nada.toml"));
        assert!(warnings.is_empty());
        assert_eq!(opts.ocr_language, "eng");
        assert_eq!(opts.output_suffix, "_extracted");
    }

    #[test]
    fn test_bad_config_keeps_previous_layer() {
        let dir = tempfile::TempDir::new().unwrap();
        let global = dir.path().join("config.toml");
        let local = dir.path().join("local.toml");
        std::fs::write(&global, "ocr_language = \"spa\"\n").unwrap();
        std::fs::write(&local, "render_scale = \"big\"\n").unwrap();

        let (opts, warnings) = load_config_from(Some(&global), &local);
        assert_eq!(opts.ocr_language, "spa");
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("local.toml"));
    }

    #[test]
    fn test_config_scale_must_be_positive() {
        let dir = tempfile::TempDir::new().unwrap();
        let local = dir.path().join("local.toml");
        for bad in ["0.0", "-1.5", "inf", "nan"] {
            std::fs::write(&local, format!("render_scale = {}\n", bad)).unwrap();
            let (opts, warnings) = load_config_from(None, &local);
            assert_eq!(opts.render_scale, 2.0, "render_scale = {}", bad);
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].contains("render_scale"));
        }

        std::fs::write(&local, "render_scale = 3.5\n").unwrap();
        let (opts, warnings) = load_config_from(None, &local);
        assert!(warnings.is_empty());
        assert_eq!(opts.render_scale, 3.5);
    }

    #[test]
    fn test_infinite_cli_scale_ignored() {
        let mut opts = ExtractOptions::default();
        apply_cli_overrides(&mut opts, &parse(&["--scale", "inf"]));
        assert_eq!(opts.render_scale, 2.0);
    }

    #[test]
    fn test_ocr_disabled_without_pdftoppm() {
        let binary = TesseractBinary::new("/usr/bin/tesseract");
        let missing = Err(ExtractError::Render("pdftoppm not found".to_string()));
        assert!(select_ocr(Some(binary.clone()), missing).is_none());
        assert!(select_ocr(None, Ok(())).is_none());
        assert!(select_ocr(Some(binary), Ok(())).is_some());
    }

    #[test]
    fn test_log_filter() {
        assert_eq!(log_filter(0), "info");
        assert_eq!(log_filter(1), "debug");
        assert_eq!(log_filter(5), "trace");
    }
}
