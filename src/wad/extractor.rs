use std::path::{Path, PathBuf};
use tokio::fs;

use super::compression::{Compressor, RawDeflate};
use super::error::{Result, WadError};
use super::parser::{WadParser, payload_slice};
use super::structures::{WadEntry, WadHeader};

/// Slice and decompress one entry's payload with raw DEFLATE.
pub fn extract_entry(data: &[u8], entry: &WadEntry) -> Result<Vec<u8>> {
    extract_entry_with(data, entry, &RawDeflate)
}

/// Slice and decompress one entry's payload.
///
/// The output length is not checked against `entry.decompressed_size`.
pub fn extract_entry_with<C: Compressor + ?Sized>(
    data: &[u8],
    entry: &WadEntry,
    compressor: &C,
) -> Result<Vec<u8>> {
    let payload = payload_slice(data, entry)?;
    compressor
        .decompress(payload)
        .map_err(|source| WadError::DecompressionFailure {
            name: entry.name.clone(),
            source,
        })
}

/// Path an entry is extracted to inside `dir`.
///
/// Only plain file names are accepted, so an entry cannot escape `dir`.
pub fn output_path(dir: &Path, entry: &WadEntry) -> Result<PathBuf> {
    let name = entry.name.as_str();
    let plain = !name.contains(['/', '\\', '\0'])
        && Path::new(name).file_name().is_some_and(|f| f == name);
    if !plain {
        return Err(WadError::UnsafeName {
            name: name.to_string(),
        });
    }
    Ok(dir.join(name))
}

/// WAD file extractor
pub struct WadExtractor<'a, C: Compressor = RawDeflate> {
    parser: WadParser<'a>,
    compressor: C,
}

impl<'a> WadExtractor<'a, RawDeflate> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        Self::with_compressor(data, RawDeflate)
    }
}

impl<'a, C: Compressor> WadExtractor<'a, C> {
    pub fn with_compressor(data: &'a [u8], compressor: C) -> Result<Self> {
        Ok(Self {
            parser: WadParser::new(data)?,
            compressor,
        })
    }

    pub fn header(&self) -> &WadHeader {
        self.parser.header()
    }

    /// List all entries in table order
    pub fn list_files(&self) -> &[WadEntry] {
        self.parser.entries()
    }

    /// Extract file data to memory
    pub fn extract_to_memory(&self, entry: &WadEntry) -> Result<Vec<u8>> {
        extract_entry_with(self.parser.data(), entry, &self.compressor)
    }

    /// Extract file to disk, returning the number of bytes written
    pub async fn extract_to_file(&self, entry: &WadEntry, output_path: &Path) -> Result<usize> {
        // Create parent directories if needed
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let data = self.extract_to_memory(entry)?;
        fs::write(output_path, &data).await?;

        Ok(data.len())
    }

    /// Extract every entry into `dir`, in table order.
    ///
    /// Stops at the first failing entry; entries already written stay on
    /// disk. A later entry with the same name overwrites an earlier one.
    /// `on_entry` runs after each entry is written, with its output length.
    pub async fn extract_all<F>(&self, dir: &Path, mut on_entry: F) -> Result<()>
    where
        F: FnMut(&WadEntry, usize),
    {
        fs::create_dir_all(dir).await?;

        for entry in self.list_files() {
            let path = output_path(dir, entry)?;
            let written = self.extract_to_file(entry, &path).await?;
            on_entry(entry, written);
        }

        Ok(())
    }
}
