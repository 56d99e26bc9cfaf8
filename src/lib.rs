//! # wadlink
//!
//! A Rust linker / unlinker for the `.wad` asset container.
//!
//! A WAD is one big-endian binary blob: a 16-byte header, a table of
//! 44-byte entry records and the DEFLATE-compressed payloads of every file,
//! back to back. This library converts between that layout and in-memory
//! (name, bytes) pairs; it does no I/O of its own apart from the optional
//! extract-to-disk helpers.
//!
//! ## Features
//!
//! - Decode the header and entry table from a byte buffer
//! - Extract single entries in memory, or every entry into a directory
//! - Build a container from (name, bytes) pairs with recomputed offsets
//! - Raw DEFLATE payloads by default, zlib-wrapped payloads on request
//!
//! ## Example
//!
//! ```no_run
//! use wadlink::wad::{WadExtractor, build_container};
//!
//! fn main() -> anyhow::Result<()> {
//!     let bytes = build_container([("mp_playlists.info", b"gametype tdm".to_vec())])?;
//!
//!     let extractor = WadExtractor::new(&bytes)?;
//!     for entry in extractor.list_files() {
//!         let contents = extractor.extract_to_memory(entry)?;
//!         println!("{} ({} bytes)", entry.name, contents.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod wad;

pub use cli::Cli;
pub use wad::{WadBuilder, WadEntry, WadError, WadExtractor, WadHeader};
