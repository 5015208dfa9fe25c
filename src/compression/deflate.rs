//! Zlib/deflate compression

use crate::error::{Error, Result};
use flate2::write::ZlibEncoder;
use flate2::{Decompress, FlushDecompress, Status};
use std::io::Write;

/// Compresses data into a zlib stream at the given level (0-9)
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| Error::Codec(format!("Deflate compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| Error::Codec(format!("Deflate compression failed: {}", e)))
}

/// Decompresses a complete zlib stream
///
/// The stream must end exactly at the end of `data` and inflate to at most
/// `limit` bytes. A stream cut short is an error, never a shorter result.
pub fn decompress(data: &[u8], limit: usize) -> Result<Vec<u8>> {
    let mut decoder = Decompress::new(true);
    let mut output = Vec::with_capacity((data.len() * 4).clamp(64, limit.max(64)));

    loop {
        if output.len() == output.capacity() {
            if output.len() >= limit {
                return Err(Error::Codec(format!(
                    "Decompressed payload exceeds {} bytes",
                    limit
                )));
            }
            output.reserve(output.capacity().min(limit - output.len()).max(64));
        }

        let consumed = decoder.total_in() as usize;
        let produced = decoder.total_out();
        let status = decoder
            .decompress_vec(&data[consumed..], &mut output, FlushDecompress::None)
            .map_err(|e| Error::Codec(format!("Corrupt deflate stream: {}", e)))?;

        if status == Status::StreamEnd {
            break;
        }

        let stalled = decoder.total_in() as usize == consumed && decoder.total_out() == produced;
        if stalled && output.len() < output.capacity() {
            return Err(Error::Codec("Deflate stream is truncated".to_string()));
        }
    }

    if output.len() > limit {
        return Err(Error::Codec(format!(
            "Decompressed payload exceeds {} bytes",
            limit
        )));
    }

    if decoder.total_in() as usize != data.len() {
        return Err(Error::Codec(format!(
            "{} trailing bytes after deflate stream",
            data.len() - decoder.total_in() as usize
        )));
    }

    Ok(output)
}
