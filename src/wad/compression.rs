//! Payload compression.
//!
//! Payloads are DEFLATE streams. The codec itself only needs a
//! `compress`/`decompress` pair, so the framing is pluggable through
//! [`Compressor`]: [`RawDeflate`] writes bare DEFLATE with no wrapper,
//! [`Zlib`] adds the two-byte zlib header and Adler-32 trailer.

use flate2::read::{DeflateDecoder, ZlibDecoder};
use flate2::write::{DeflateEncoder, ZlibEncoder};
use std::io::{self, Read, Write};

/// Compression primitive applied to each payload independently.
pub trait Compressor: Send + Sync {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>>;

    fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>>;
}

impl<C: Compressor + ?Sized> Compressor for Box<C> {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        (**self).compress(data)
    }

    fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        (**self).decompress(data)
    }
}

/// Pick the framing at runtime.
pub fn select(zlib: bool) -> Box<dyn Compressor> {
    if zlib {
        Box::new(Zlib)
    } else {
        Box::new(RawDeflate)
    }
}

/// Raw DEFLATE (RFC 1951), no header or checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDeflate;

impl Compressor for RawDeflate {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = DeflateEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        DeflateDecoder::new(data).read_to_end(&mut out)?;
        Ok(out)
    }
}

/// zlib-wrapped DEFLATE (RFC 1950).
#[derive(Debug, Clone, Copy, Default)]
pub struct Zlib;

impl Compressor for Zlib {
    fn compress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(&self, data: &[u8]) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        ZlibDecoder::new(data).read_to_end(&mut out)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_deflate_has_no_wrapper() {
        // fixed-Huffman block holding the single literal 'A'
        assert_eq!(RawDeflate.decompress(&[0x73, 0x04, 0x00]).unwrap(), b"A");

        let packed = RawDeflate.compress(b"hello hello hello").unwrap();
        assert_ne!(packed[0], 0x78);
        assert_eq!(RawDeflate.decompress(&packed).unwrap(), b"hello hello hello");
    }

    #[test]
    fn zlib_has_header() {
        let packed = Zlib.compress(b"hello").unwrap();
        assert_eq!(packed[0], 0x78);
        assert_eq!(Zlib.decompress(&packed).unwrap(), b"hello");
        assert!(RawDeflate.decompress(&packed).is_err());
    }

    #[test]
    fn reserved_block_type_is_an_error() {
        assert!(RawDeflate.decompress(&[0xFF; 8]).is_err());
    }
}
