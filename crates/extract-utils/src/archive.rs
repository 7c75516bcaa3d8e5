//! ZIP archive utilities for writing and inspecting OOXML packages.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use zip::read::ZipArchive;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// Read a single part from inside a ZIP package.
pub fn read_zip_entry(zip_path: &Path, entry_name: &str) -> io::Result<Vec<u8>> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;
    let mut entry = archive.by_name(entry_name)?;
    let mut buf = Vec::new();
    entry.read_to_end(&mut buf)?;
    Ok(buf)
}

/// List all part names in a ZIP package, in archive order.
pub fn list_zip_entries(zip_path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(zip_path)?;
    let archive = ZipArchive::new(file)?;
    let entries = (0..archive.len())
        .filter_map(|i| archive.name_for_index(i).map(|s| s.to_string()))
        .collect();
    Ok(entries)
}

/// Builder for ZIP packages. Parts are deflated.
pub struct ZipBuilder {
    writer: ZipWriter<File>,
    parts: usize,
}

impl ZipBuilder {
    /// Create a new ZIP file at the given path, truncating any existing file.
    pub fn new(path: &Path) -> io::Result<Self> {
        Ok(Self::from_file(File::create(path)?))
    }

    /// Write into an already open, empty file.
    pub fn from_file(file: File) -> Self {
        Self {
            writer: ZipWriter::new(file),
            parts: 0,
        }
    }

    /// Add a part with the given content.
    pub fn add_file(&mut self, name: &str, content: &[u8]) -> io::Result<()> {
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        self.writer.start_file(name, options)?;
        self.writer.write_all(content)?;
        self.parts += 1;
        log::trace!("zip part {} ({} bytes)", name, content.len());
        Ok(())
    }

    /// Finish writing the archive and flush the central directory.
    pub fn finish(self) -> io::Result<()> {
        log::debug!("Finishing zip with {} parts", self.parts);
        self.writer.finish()?;
        Ok(())
    }
}
