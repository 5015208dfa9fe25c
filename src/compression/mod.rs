//! Compression of packed zone buffers

pub mod deflate;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Compression applied to the raw wire buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// No compression
    None,
    /// Zlib/deflate compression
    #[default]
    Deflate,
}

impl Compression {
    /// Returns the name of this compression type
    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "None",
            Compression::Deflate => "Deflate/ZIP",
        }
    }

    /// Compresses data; `level` is only used by deflate
    pub fn compress(&self, data: &[u8], level: u32) -> Result<Vec<u8>> {
        match self {
            Compression::None => Ok(data.to_vec()),
            Compression::Deflate => deflate::compress(data, level),
        }
    }

    /// Decompresses data, producing at most `limit` bytes
    pub fn decompress(&self, data: &[u8], limit: usize) -> Result<Vec<u8>> {
        match self {
            Compression::None if data.len() > limit => Err(crate::error::Error::Codec(format!(
                "Payload exceeds {} bytes",
                limit
            ))),
            Compression::None => Ok(data.to_vec()),
            Compression::Deflate => deflate::decompress(data, limit),
        }
    }
}
