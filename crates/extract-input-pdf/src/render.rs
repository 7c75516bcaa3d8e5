//! PDF page rasterization via `pdftoppm` (poppler-utils).

use std::path::Path;
use std::process::Command;

use image::DynamicImage;

use extract_core::error::{ExtractError, Result};

use crate::backend::PageRasterizer;

/// PDF user space resolution; a scale of 1.0 renders at this DPI.
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Check that pdftoppm is available on the system.
pub fn check_pdftoppm() -> Result<()> {
    let probe = Command::new("pdftoppm")
        .arg("-v")
        .output()
        .map_err(|e| {
            ExtractError::Render(format!(
                "pdftoppm (poppler-utils) is required for OCR rendering ({}). \
                 Install with: brew install poppler (macOS) or apt install poppler-utils (Linux)",
                e
            ))
        })?;

    // pdftoppm -v exits 0 on poppler, 99 on some xpdf builds; both print a version.
    if !probe.status.success() && probe.stderr.is_empty() {
        return Err(ExtractError::Render(
            "pdftoppm did not report a version".to_string(),
        ));
    }
    Ok(())
}

/// Rendering resolution for a magnification factor.
pub fn scale_to_dpi(scale: f32) -> u32 {
    (PDF_POINTS_PER_INCH * scale).round().max(1.0) as u32
}

/// Renders pages one at a time into a scratch directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdftoppmRasterizer;

impl PageRasterizer for PdftoppmRasterizer {
    fn render(&self, pdf_path: &Path, page_number: u32, scale: f32) -> Result<DynamicImage> {
        let tmp_dir = tempfile::TempDir::new()
            .map_err(|e| ExtractError::Render(format!("Failed to create temp dir: {}", e)))?;

        let prefix = tmp_dir.path().join("page");
        let dpi = scale_to_dpi(scale).to_string();
        let page = page_number.to_string();

        log::debug!("[pdftoppm] Rendering page {} at {} DPI", page_number, dpi);

        let output = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg(&dpi)
            .arg("-f")
            .arg(&page)
            .arg("-l")
            .arg(&page)
            .arg("-singlefile")
            .arg(pdf_path.as_os_str())
            .arg(prefix.as_os_str())
            .output()
            .map_err(|e| ExtractError::Render(format!("Failed to run pdftoppm: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ExtractError::Render(format!(
                "pdftoppm failed for page {}: {}",
                page_number,
                stderr.trim()
            )));
        }

        let png_path = prefix.with_extension("png");
        let data = std::fs::read(&png_path).map_err(|e| {
            ExtractError::Render(format!(
                "Failed to read rendered page {}: {}",
                page_number, e
            ))
        })?;

        decode_page_image(&data, page_number)
    }
}

/// Decode rendered page bytes into an image buffer.
pub fn decode_page_image(data: &[u8], page_number: u32) -> Result<DynamicImage> {
    let image = image::load_from_memory(data).map_err(|e| {
        ExtractError::Render(format!("Failed to decode page {} image: {}", page_number, e))
    })?;

    if image.width() == 0 || image.height() == 0 {
        return Err(ExtractError::Render(format!(
            "Page {} rendered to an empty image",
            page_number
        )));
    }

    log::trace!(
        "Page {} raster: {}x{}",
        page_number,
        image.width(),
        image.height()
    );
    Ok(image)
}
