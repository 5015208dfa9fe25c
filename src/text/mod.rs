//! Printable text encodings for character-only transports

pub mod base85;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Text encoding applied to the compressed buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextEncoding {
    /// 5 characters per 4 bytes, RFC 1924 alphabet
    #[default]
    Base85,
    /// 4 characters per 3 bytes, standard padded alphabet
    Base64,
}

impl TextEncoding {
    /// Encodes bytes as text
    pub fn encode(&self, data: &[u8]) -> String {
        match self {
            TextEncoding::Base85 => base85::encode(data),
            TextEncoding::Base64 => STANDARD.encode(data),
        }
    }

    /// Decodes text back into bytes; surrounding whitespace is ignored
    pub fn decode(&self, text: &str) -> Result<Vec<u8>> {
        let text = text.trim();
        match self {
            TextEncoding::Base85 => base85::decode(text),
            TextEncoding::Base64 => STANDARD
                .decode(text)
                .map_err(|e| Error::Codec(format!("Invalid base64 text: {}", e))),
        }
    }
}
