//! Container assembly.
//!
//! Building runs in three steps, and the order matters:
//! 1. Compress every file, which fixes each `compressed_size`
//! 2. Assign offsets sequentially from the end of the entry table
//! 3. Emit header, entry table and payloads, all in input order

use std::time::{SystemTime, UNIX_EPOCH};

use super::compression::{Compressor, RawDeflate};
use super::error::{Result, WadError};
use super::structures::*;

/// Encode a header. Always 16 bytes.
pub fn encode_header(header: &WadHeader) -> [u8; HEADER_SIZE] {
    header.to_bytes()
}

/// Encode the entry table, one 44-byte record per entry in order.
///
/// # Errors
///
/// Fails on the first name that is not ASCII or is longer than 32 bytes.
pub fn encode_entries(entries: &[WadEntry]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(ENTRY_SIZE * entries.len());
    for entry in entries {
        entry.write_to(&mut out)?;
    }
    Ok(out)
}

/// Set each entry's offset from its predecessor's offset and compressed size.
///
/// The first payload starts right after the entry table.
pub fn assign_offsets(entries: &mut [WadEntry]) -> Result<()> {
    let mut offset = table_size(entries.len()) as u64;
    for entry in entries.iter_mut() {
        entry.offset = to_u32(offset)?;
        offset += entry.compressed_size as u64;
    }
    // the last payload must end inside 32-bit address space too
    to_u32(offset)?;
    Ok(())
}

/// Build a container from (name, contents) pairs with raw DEFLATE payloads,
/// the current time and format version 0.
pub fn build_container<N, D>(files: impl IntoIterator<Item = (N, D)>) -> Result<Vec<u8>>
where
    N: Into<String>,
    D: AsRef<[u8]>,
{
    let mut builder = WadBuilder::new();
    for (name, data) in files {
        builder.add_file(name, data)?;
    }
    builder.build()
}

/// Current time as Unix seconds, saturating at the 32-bit limit.
pub fn unix_now() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().min(u32::MAX as u64) as u32)
        .unwrap_or(0)
}

struct PendingFile {
    entry: WadEntry,
    payload: Vec<u8>,
}

/// Incremental container builder.
///
/// Files are compressed as they are added; offsets are assigned and the
/// output laid out in [`build`](Self::build).
///
/// ## Example
///
/// ```ignore
/// let mut builder = WadBuilder::new().timestamp(0).format_version(1);
/// builder.add_file("playlists.info", b"...")?;
/// let bytes = builder.build()?;
/// ```
pub struct WadBuilder<C: Compressor = RawDeflate> {
    compressor: C,
    timestamp: u32,
    format_version: u32,
    files: Vec<PendingFile>,
}

impl WadBuilder<RawDeflate> {
    pub fn new() -> Self {
        Self::with_compressor(RawDeflate)
    }
}

impl Default for WadBuilder<RawDeflate> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Compressor> WadBuilder<C> {
    pub fn with_compressor(compressor: C) -> Self {
        Self {
            compressor,
            timestamp: unix_now(),
            format_version: 0,
            files: Vec::new(),
        }
    }

    /// Override the creation time (Unix seconds).
    pub fn timestamp(mut self, timestamp: u32) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn format_version(mut self, format_version: u32) -> Self {
        self.format_version = format_version;
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Compress `data` and queue it as the next entry.
    ///
    /// The name is validated here so a bad name fails before any
    /// further work is done.
    pub fn add_file(
        &mut self,
        name: impl Into<String>,
        data: impl AsRef<[u8]>,
    ) -> Result<&WadEntry> {
        let name = name.into();
        let data = data.as_ref();
        encode_name(&name)?;

        let payload = self
            .compressor
            .compress(data)
            .map_err(|source| WadError::CompressionFailure {
                name: name.clone(),
                source,
            })?;

        let entry = WadEntry {
            compressed_size: to_u32(payload.len() as u64)?,
            decompressed_size: to_u32(data.len() as u64)?,
            offset: 0,
            name,
        };

        self.files.push(PendingFile { entry, payload });
        Ok(&self.files[self.files.len() - 1].entry)
    }

    /// Assign offsets and lay out the container.
    pub fn build(self) -> Result<Vec<u8>> {
        let (mut entries, payloads): (Vec<_>, Vec<_>) = self
            .files
            .into_iter()
            .map(|file| (file.entry, file.payload))
            .unzip();

        assign_offsets(&mut entries)?;

        let header = WadHeader::new(
            self.timestamp,
            to_u32(entries.len() as u64)?,
            self.format_version,
        );
        let table = encode_entries(&entries)?;

        let payload_len: usize = payloads.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(HEADER_SIZE + table.len() + payload_len);
        out.extend_from_slice(&encode_header(&header));
        out.extend_from_slice(&table);
        for payload in &payloads {
            out.extend_from_slice(payload);
        }

        Ok(out)
    }
}

fn to_u32(size: u64) -> Result<u32> {
    u32::try_from(size).map_err(|_| WadError::ContainerTooLarge { size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wad::compression::Zlib;
    use crate::wad::extractor::{WadExtractor, extract_entry};
    use crate::wad::parser::decode_container;

    fn sample_files() -> Vec<(&'static str, Vec<u8>)> {
        vec![
            ("mp_playlists.info", b"gametype tdm\n".repeat(40)),
            ("empty.bin", Vec::new()),
            ("abcdefghijklmnopqrstuvwxyz012345", (0u8..=255).collect()),
            ("", vec![0x41]),
        ]
    }

    #[test]
    fn round_trip_preserves_order_and_content() {
        let files = sample_files();
        let data = build_container(files.clone()).unwrap();
        let (header, entries) = decode_container(&data).unwrap();

        assert_eq!(header.magic, MAGIC);
        assert_eq!(header.entry_count as usize, files.len());
        assert_eq!(header.format_version, 0);
        assert_eq!(entries.len(), files.len());

        for ((name, contents), entry) in files.iter().zip(&entries) {
            assert_eq!(entry.name, *name);
            assert_eq!(entry.decompressed_size as usize, contents.len());
            assert_eq!(&extract_entry(&data, entry).unwrap(), contents);
        }
    }

    #[test]
    fn offsets_are_contiguous() {
        let data = build_container(sample_files()).unwrap();
        let (_, entries) = decode_container(&data).unwrap();

        assert_eq!(entries[0].offset as usize, table_size(entries.len()));
        for pair in entries.windows(2) {
            assert_eq!(pair[1].offset, pair[0].offset + pair[0].compressed_size);
        }
        let last = entries.last().unwrap();
        assert_eq!((last.offset + last.compressed_size) as usize, data.len());
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let mut builder = WadBuilder::new().timestamp(1_257_894_000).format_version(1);
        for (name, contents) in sample_files() {
            builder.add_file(name, contents).unwrap();
        }
        let original = builder.build().unwrap();

        let extractor = WadExtractor::new(&original).unwrap();
        let header = *extractor.header();
        let mut rebuilt = WadBuilder::new()
            .timestamp(header.timestamp)
            .format_version(header.format_version);
        for entry in extractor.list_files() {
            let contents = extractor.extract_to_memory(entry).unwrap();
            rebuilt.add_file(entry.name.clone(), contents).unwrap();
        }

        assert_eq!(rebuilt.build().unwrap(), original);
    }

    #[test]
    fn empty_container_is_header_only() {
        let data = WadBuilder::new().timestamp(5).build().unwrap();
        assert_eq!(data, WadHeader::new(5, 0, 0).to_bytes());
    }

    #[test]
    fn long_name_aborts() {
        let mut builder = WadBuilder::new();
        builder.add_file("ok.txt", b"fine").unwrap();
        let err = builder.add_file("x".repeat(33), b"nope").unwrap_err();
        assert!(matches!(err, WadError::NameTooLong { len: 33, .. }));
        assert_eq!(builder.len(), 1);

        let err = build_container([("y".repeat(40), b"data")]).unwrap_err();
        assert!(matches!(err, WadError::NameTooLong { len: 40, .. }));
    }

    #[test]
    fn encode_entries_rejects_bad_names() {
        let entry = WadEntry {
            name: "z".repeat(33),
            compressed_size: 0,
            decompressed_size: 0,
            offset: 0,
        };
        assert!(matches!(
            encode_entries(&[entry]),
            Err(WadError::NameTooLong { .. })
        ));
    }

    #[test]
    fn offsets_that_overflow_are_rejected() {
        let mut entries = vec![
            WadEntry {
                name: "big".to_string(),
                compressed_size: u32::MAX - 10,
                decompressed_size: 0,
                offset: 0,
            },
            WadEntry {
                name: "next".to_string(),
                compressed_size: 1,
                decompressed_size: 0,
                offset: 0,
            },
        ];
        assert!(matches!(
            assign_offsets(&mut entries),
            Err(WadError::ContainerTooLarge { .. })
        ));
    }

    #[test]
    fn zlib_framing_round_trip() {
        let mut builder = WadBuilder::with_compressor(Zlib).timestamp(0);
        builder.add_file("a.txt", b"zlib framed").unwrap();
        let data = builder.build().unwrap();

        let extractor = WadExtractor::with_compressor(&data, Zlib).unwrap();
        let entry = &extractor.list_files()[0];
        assert_eq!(data[entry.offset as usize], 0x78);
        assert_eq!(extractor.extract_to_memory(entry).unwrap(), b"zlib framed");
    }
}
