use byteorder::{BigEndian, ByteOrder, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read};

use super::error::{Result, WadError};

/// Byte order of every integer field in the container.
pub type WadEndian = BigEndian;

/// Container magic, stored as `54 33 77 AB`.
pub const MAGIC: u32 = 0x543377AB;

/// Header - 16 bytes
pub const HEADER_SIZE: usize = 16;

/// Entry record - 44 bytes
pub const ENTRY_SIZE: usize = 44;

/// Width of the NUL-padded name field at the start of an entry record.
pub const NAME_SIZE: usize = 32;

/// Read a 4-byte big-endian field.
pub fn read_u32_be(bytes: [u8; 4]) -> u32 {
    WadEndian::read_u32(&bytes)
}

/// Write a value as a 4-byte big-endian field.
pub fn write_u32_be(value: u32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    WadEndian::write_u32(&mut buf, value);
    buf
}

/// Size of the header plus an entry table of `count` records.
///
/// This is also the offset of the first payload byte.
pub fn table_size(count: usize) -> usize {
    HEADER_SIZE + ENTRY_SIZE * count
}

/// Checked variant of [`table_size`] for counts read from untrusted input.
pub(crate) fn checked_table_size(count: usize) -> Option<usize> {
    ENTRY_SIZE.checked_mul(count)?.checked_add(HEADER_SIZE)
}

/// WAD header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WadHeader {
    pub magic: u32,
    /// Creation time, Unix seconds
    pub timestamp: u32,
    pub entry_count: u32,
    /// Passed through untouched; 0 or 1 in the wild.
    pub format_version: u32,
}

impl WadHeader {
    pub fn new(timestamp: u32, entry_count: u32, format_version: u32) -> Self {
        Self {
            magic: MAGIC,
            timestamp,
            entry_count,
            format_version,
        }
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(WadError::TruncatedBuffer {
                needed: HEADER_SIZE,
                actual: data.len(),
            });
        }

        let mut cursor = Cursor::new(&data[..HEADER_SIZE]);

        let magic = cursor.read_u32::<WadEndian>()?;
        if magic != MAGIC {
            return Err(WadError::InvalidMagic { found: magic });
        }

        Ok(Self {
            magic,
            timestamp: cursor.read_u32::<WadEndian>()?,
            entry_count: cursor.read_u32::<WadEndian>()?,
            format_version: cursor.read_u32::<WadEndian>()?,
        })
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        for (field, value) in buf.chunks_exact_mut(4).zip([
            self.magic,
            self.timestamp,
            self.entry_count,
            self.format_version,
        ]) {
            field.copy_from_slice(&write_u32_be(value));
        }
        buf
    }

    /// Parse the timestamp to (year, month, day), UTC
    pub fn created_date(&self) -> (i64, u8, u8) {
        civil_from_days(self.timestamp as i64 / 86_400)
    }

    /// Parse the timestamp to (hour, minute, second), UTC
    pub fn created_time(&self) -> (u8, u8, u8) {
        let secs = self.timestamp % 86_400;
        ((secs / 3600) as u8, ((secs / 60) % 60) as u8, (secs % 60) as u8)
    }
}

/// One record of the entry table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WadEntry {
    pub name: String,
    pub compressed_size: u32,
    pub decompressed_size: u32,
    /// Absolute offset of the compressed payload within the container
    pub offset: u32,
}

impl WadEntry {
    /// Decode one 44-byte record. The caller guarantees the length.
    pub(crate) fn from_bytes(record: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(record);

        let mut name_field = [0u8; NAME_SIZE];
        cursor.read_exact(&mut name_field)?;

        Ok(Self {
            name: decode_name(&name_field),
            compressed_size: cursor.read_u32::<WadEndian>()?,
            decompressed_size: cursor.read_u32::<WadEndian>()?,
            offset: cursor.read_u32::<WadEndian>()?,
        })
    }

    /// Append the 44-byte record for this entry to `out`.
    pub(crate) fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
        out.extend_from_slice(&encode_name(&self.name)?);
        out.write_u32::<WadEndian>(self.compressed_size)?;
        out.write_u32::<WadEndian>(self.decompressed_size)?;
        out.write_u32::<WadEndian>(self.offset)?;
        Ok(())
    }

    /// Byte range of the payload, or `None` if it overflows `usize`.
    pub fn payload_range(&self) -> Option<std::ops::Range<usize>> {
        let start = self.offset as usize;
        let end = start.checked_add(self.compressed_size as usize)?;
        Some(start..end)
    }
}

/// Decode the name field as ASCII, dropping trailing NUL padding only.
///
/// Bytes outside ASCII become `?`.
fn decode_name(field: &[u8; NAME_SIZE]) -> String {
    let len = field.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    field[..len]
        .iter()
        .map(|&b| if b.is_ascii() { b as char } else { '?' })
        .collect()
}

/// Left-justify the name in a NUL-padded 32-byte field.
pub(crate) fn encode_name(name: &str) -> Result<[u8; NAME_SIZE]> {
    if !name.is_ascii() {
        return Err(WadError::NonAsciiName {
            name: name.to_string(),
        });
    }
    if name.len() > NAME_SIZE {
        return Err(WadError::NameTooLong {
            name: name.to_string(),
            len: name.len(),
        });
    }

    let mut field = [0u8; NAME_SIZE];
    field[..name.len()].copy_from_slice(name.as_bytes());
    Ok(field)
}

/// Days since 1970-01-01 to a proleptic Gregorian (year, month, day).
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month, day)
}
