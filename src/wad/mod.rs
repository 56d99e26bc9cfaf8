//! WAD container codec.
//!
//! ## Architecture
//!
//! - [`structures`]: layout constants, the byte-order primitive, header and entry records
//! - [`parser`]: decoding of the header and entry table from a byte buffer
//! - [`extractor`]: payload slicing and decompression, in memory or to disk
//! - [`builder`]: compression, offset assignment and container assembly
//! - [`compression`]: the DEFLATE framings payloads can use
//!
//! ## Format Overview
//!
//! A WAD file consists of, big-endian throughout:
//! 1. A 16-byte header: magic `0x543377AB`, timestamp, entry count, format version
//! 2. The entry table, 44 bytes per entry: a NUL-padded 32-byte ASCII name,
//!    compressed size, decompressed size and payload offset
//! 3. The compressed payloads, back to back in table order, the first one
//!    starting at `16 + 44 * entry_count`
//!
//! ## Limitations
//!
//! - One fixed layout; little-endian (PC) containers are rejected by the magic check
//! - No checksums, the format has none
//! - Whole containers are held in memory

pub mod builder;
pub mod compression;
pub mod error;
pub mod extractor;
pub mod parser;
pub mod structures;

pub use builder::{WadBuilder, assign_offsets, build_container, encode_entries, encode_header};
pub use compression::{Compressor, RawDeflate, Zlib};
pub use error::{Result, WadError};
pub use extractor::{WadExtractor, extract_entry, extract_entry_with, output_path};
pub use parser::{WadParser, decode_container, decode_entries, decode_header};
pub use structures::*;
