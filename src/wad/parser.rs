//! Decoding of the header and entry table.
//!
//! ## Parsing Strategy
//!
//! The container is read front to back from an in-memory buffer:
//! 1. Decode the 16-byte header and check the magic
//! 2. Check the buffer holds `entry_count` 44-byte records
//! 3. Decode each record in table order
//!
//! Entries are not cross-checked against each other. A table whose offsets
//! overlap or point past the end still decodes; the bad entry only fails
//! when its payload is sliced out.

use super::error::{Result, WadError};
use super::structures::*;

/// Decode the header from the first 16 bytes of `data`.
pub fn decode_header(data: &[u8]) -> Result<WadHeader> {
    WadHeader::from_bytes(data)
}

/// Decode `entry_count` records starting right after the header.
///
/// # Errors
///
/// Returns [`WadError::TruncatedBuffer`] if `data` is shorter than
/// `16 + 44 * entry_count` bytes.
pub fn decode_entries(data: &[u8], entry_count: u32) -> Result<Vec<WadEntry>> {
    let count = entry_count as usize;
    let needed = checked_table_size(count).ok_or(WadError::TruncatedBuffer {
        needed: usize::MAX,
        actual: data.len(),
    })?;
    if data.len() < needed {
        return Err(WadError::TruncatedBuffer {
            needed,
            actual: data.len(),
        });
    }

    data[HEADER_SIZE..needed]
        .chunks_exact(ENTRY_SIZE)
        .map(WadEntry::from_bytes)
        .collect()
}

/// Decode the header and the full entry table.
pub fn decode_container(data: &[u8]) -> Result<(WadHeader, Vec<WadEntry>)> {
    let header = decode_header(data)?;
    let entries = decode_entries(data, header.entry_count)?;
    Ok((header, entries))
}

/// Borrowed view over one container buffer.
///
/// Decodes the header and table once up front and hands out payload
/// slices on request.
///
/// ## Example
///
/// ```ignore
/// let parser = WadParser::new(&bytes)?;
/// for entry in parser.entries() {
///     let payload = parser.payload(entry)?;
///     // Decompress payload...
/// }
/// ```
#[derive(Debug)]
pub struct WadParser<'a> {
    data: &'a [u8],
    header: WadHeader,
    entries: Vec<WadEntry>,
}

impl<'a> WadParser<'a> {
    pub fn new(data: &'a [u8]) -> Result<Self> {
        let (header, entries) = decode_container(data)?;
        Ok(Self {
            data,
            header,
            entries,
        })
    }

    pub fn header(&self) -> &WadHeader {
        &self.header
    }

    pub fn entries(&self) -> &[WadEntry] {
        &self.entries
    }

    /// The whole container buffer.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Slice the compressed payload of `entry` out of the buffer.
    pub fn payload(&self, entry: &WadEntry) -> Result<&'a [u8]> {
        payload_slice(self.data, entry)
    }
}

/// `data[offset .. offset + compressed_size]`, bounds-checked.
pub(crate) fn payload_slice<'a>(data: &'a [u8], entry: &WadEntry) -> Result<&'a [u8]> {
    entry
        .payload_range()
        .and_then(|range| data.get(range))
        .ok_or_else(|| WadError::OutOfBounds {
            name: entry.name.clone(),
            offset: entry.offset,
            size: entry.compressed_size,
            len: data.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_bytes(
        name: &str,
        compressed_size: u32,
        decompressed_size: u32,
        offset: u32,
    ) -> Vec<u8> {
        let mut out = Vec::new();
        WadEntry {
            name: name.to_string(),
            compressed_size,
            decompressed_size,
            offset,
        }
        .write_to(&mut out)
        .unwrap();
        out
    }

    #[test]
    fn magic_is_checked_before_anything_else() {
        let mut data = vec![0u8; 64];
        data[..4].copy_from_slice(&[0x00, 0x00, 0x00, 0x01]);
        assert!(matches!(
            decode_container(&data),
            Err(WadError::InvalidMagic { found: 1 })
        ));
    }

    #[test]
    fn truncated_table() {
        let mut data = WadHeader::new(0, 5, 0).to_bytes().to_vec();
        data.extend(entry_bytes("one", 0, 0, 236));
        data.extend(entry_bytes("two", 0, 0, 236));
        assert_eq!(data.len(), 16 + 44 * 2);

        match decode_container(&data) {
            Err(WadError::TruncatedBuffer { needed, actual }) => {
                assert_eq!(needed, 236);
                assert_eq!(actual, 104);
            }
            other => panic!("expected TruncatedBuffer, got {:?}", other),
        }
    }

    #[test]
    fn empty_table() {
        let data = WadHeader::new(7, 0, 1).to_bytes();
        let (header, entries) = decode_container(&data).unwrap();
        assert_eq!(header.timestamp, 7);
        assert_eq!(header.format_version, 1);
        assert!(entries.is_empty());
    }

    #[test]
    fn inconsistent_table_still_decodes() {
        let mut data = WadHeader::new(0, 2, 0).to_bytes().to_vec();
        data.extend(entry_bytes("a", 10, 4, 9_999));
        data.extend(entry_bytes("b", 10, 4, 16));

        let parser = WadParser::new(&data).unwrap();
        assert_eq!(parser.entries().len(), 2);
        assert!(matches!(
            parser.payload(&parser.entries()[0]),
            Err(WadError::OutOfBounds { offset: 9_999, .. })
        ));
        // overlaps the header, but is in range
        assert_eq!(parser.payload(&parser.entries()[1]).unwrap(), &data[16..26]);
    }

    #[test]
    fn payload_follows_table() {
        let mut data = WadHeader::new(0, 1, 0).to_bytes().to_vec();
        data.extend(entry_bytes("x.bin", 2, 2, 60));
        data.extend([0xAA, 0xBB, 0xCC]);

        let parser = WadParser::new(&data).unwrap();
        let entry = &parser.entries()[0];
        assert_eq!(entry.name, "x.bin");
        assert_eq!(parser.payload(entry).unwrap(), &[0xAA, 0xBB]);
    }
}
