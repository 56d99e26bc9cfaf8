use thiserror::Error;

/// Errors produced while decoding, extracting or building a WAD container.
#[derive(Debug, Error)]
pub enum WadError {
    #[error("not a WAD file: bad magic 0x{found:08X} (expected 0x543377AB)")]
    InvalidMagic { found: u32 },

    #[error("truncated WAD: need {needed} bytes for header and entry table, have {actual}")]
    TruncatedBuffer { needed: usize, actual: usize },

    #[error("{name}: payload at offset {offset} (+{size} bytes) is outside the {len}-byte container")]
    OutOfBounds {
        name: String,
        offset: u32,
        size: u32,
        len: usize,
    },

    #[error("{name}: name is {len} bytes, the entry field holds at most 32")]
    NameTooLong { name: String, len: usize },

    #[error("{name}: name is not ASCII")]
    NonAsciiName { name: String },

    #[error("{name}: entry name is not a plain file name")]
    UnsafeName { name: String },

    #[error("{name}: compression failed: {source}")]
    CompressionFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{name}: decompression failed: {source}")]
    DecompressionFailure {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("container too large: {size} bytes does not fit a 32-bit field")]
    ContainerTooLarge { size: u64 },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WadError>;
