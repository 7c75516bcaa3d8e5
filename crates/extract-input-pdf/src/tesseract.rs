//! Tesseract discovery and the subprocess-backed OCR engine.

use std::path::{Path, PathBuf};
use std::process::Command;

use image::DynamicImage;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use extract_core::error::{ExtractError, Result};

use crate::backend::OcrEngine;

/// Where installers usually put tesseract, checked after any configured paths.
pub const DEFAULT_TESSERACT_PATHS: &[&str] = &[
    r"C:\Program Files\Tesseract-OCR\tesseract.exe",
    r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe",
    r"C:\Users\%USERNAME%\AppData\Local\Programs\Tesseract-OCR\tesseract.exe",
    "/usr/bin/tesseract",
    "/usr/local/bin/tesseract",
    "/opt/homebrew/bin/tesseract",
];

/// Shown next to the "not found" warning.
pub const INSTALL_HINT: &str = "https://github.com/UB-Mannheim/tesseract/wiki";

static ENV_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"%([A-Za-z_][A-Za-z0-9_]*)%|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("static regex")
});

/// A tesseract executable that is known to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesseractBinary {
    path: PathBuf,
}

impl TesseractBinary {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Expand `%VAR%`, `$VAR` and `${VAR}` from the environment.
/// Variables that are not set are left as written.
pub fn expand_env_vars(input: &str) -> String {
    ENV_VAR
        .replace_all(input, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .or_else(|| caps.get(3))
                .map(|m| m.as_str())
                .unwrap_or_default();
            std::env::var(name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Find a usable tesseract binary.
///
/// `configured` paths are tried before the built-in install locations. When no
/// candidate exists on disk, `tesseract --version` is run through the search
/// path and a successful exit counts as found.
pub fn locate_tesseract(configured: &[String]) -> Option<TesseractBinary> {
    let candidates = configured
        .iter()
        .map(String::as_str)
        .chain(DEFAULT_TESSERACT_PATHS.iter().copied());

    for candidate in candidates {
        let expanded = PathBuf::from(expand_env_vars(candidate));
        log::trace!("Checking for tesseract at {}", expanded.display());
        if expanded.is_file() {
            log::info!("Found Tesseract at: {}", expanded.display());
            return Some(TesseractBinary::new(expanded));
        }
    }

    match Command::new("tesseract").arg("--version").output() {
        Ok(output) if output.status.success() => {
            log::info!("Found Tesseract in PATH");
            Some(TesseractBinary::new("tesseract"))
        }
        Ok(output) => {
            log::debug!("tesseract --version exited with {}", output.status);
            None
        }
        Err(e) => {
            log::debug!("tesseract not on PATH: {}", e);
            None
        }
    }
}

/// Runs `tesseract <image> stdout -l <lang>` for each page image.
pub struct TesseractEngine {
    binary: TesseractBinary,
}

impl TesseractEngine {
    pub fn new(binary: TesseractBinary) -> Self {
        Self { binary }
    }
}

impl OcrEngine for TesseractEngine {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &DynamicImage, language: &str) -> Result<String> {
        let scratch = tempfile::Builder::new()
            .prefix("page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| ExtractError::Ocr(format!("Failed to create temp file: {}", e)))?;

        image
            .save_with_format(scratch.path(), image::ImageFormat::Png)
            .map_err(|e| ExtractError::Ocr(format!("Failed to write page image: {}", e)))?;

        let output = Command::new(self.binary.path())
            .arg(scratch.path())
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .output()
            .map_err(|e| {
                ExtractError::Ocr(format!(
                    "Failed to run {}: {}",
                    self.binary.path().display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Ocr(format!(
                "tesseract exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_vars_all_syntaxes() {
        std::env::set_var("PDF_OCR_TEST_HOME", "/home/reader");
        assert_eq!(expand_env_vars("%PDF_OCR_TEST_HOME%/bin"), "/home/reader/bin");
        assert_eq!(expand_env_vars("$PDF_OCR_TEST_HOME/bin"), "/home/reader/bin");
        assert_eq!(expand_env_vars("${PDF_OCR_TEST_HOME}/bin"), "/home/reader/bin");
    }

    #[test]
    fn test_unknown_var_left_verbatim() {
        std::env::remove_var("PDF_OCR_TEST_UNSET");
        assert_eq!(
            expand_env_vars(r"C:\Users\%PDF_OCR_TEST_UNSET%\tesseract.exe"),
            r"C:\Users\%PDF_OCR_TEST_UNSET%\tesseract.exe"
        );
        assert_eq!(expand_env_vars("$PDF_OCR_TEST_UNSET/x"), "$PDF_OCR_TEST_UNSET/x");
    }

    #[test]
    fn test_plain_path_untouched() {
        assert_eq!(expand_env_vars("/usr/bin/tesseract"), "/usr/bin/tesseract");
    }

    #[test]
    fn test_configured_path_wins() {
        let dir = tempfile::TempDir::new().unwrap();
        let fake = dir.path().join("tesseract-custom");
        std::fs::write(&fake, b"").unwrap();

        let found = locate_tesseract(&[fake.to_string_lossy().into_owned()]).unwrap();
        assert_eq!(found.path(), fake.as_path());
    }

    #[test]
    fn test_configured_path_with_env_var() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("tess"), b"").unwrap();
        std::env::set_var("PDF_OCR_TEST_DIR", dir.path());

        let found = locate_tesseract(&["${PDF_OCR_TEST_DIR}/tess".to_string()]).unwrap();
        assert_eq!(found.path(), dir.path().join("tess").as_path());
    }

    #[test]
    fn test_missing_configured_path_falls_through() {
        let found = locate_tesseract(&["/definitely/not/here/tesseract".to_string()]);
        if let Some(binary) = found {
            assert_ne!(binary.path(), Path::new("/definitely/not/here/tesseract"));
        }
    }

    #[test]
    fn test_engine_reports_spawn_failure() {
        let engine = TesseractEngine::new(TesseractBinary::new("/nonexistent/tesseract"));
        let image = DynamicImage::ImageRgb8(image::RgbImage::new(4, 4));
        let err = engine.recognize(&image, "eng").unwrap_err();
        assert!(matches!(err, ExtractError::Ocr(_)));
    }
}
