//! Base85 text encoding
//!
//! RFC 1924 alphabet, the same one Python's `base64.b85encode` uses. Every
//! 4 input bytes become 5 printable characters; a trailing group of `n`
//! bytes becomes `n + 1` characters.

use crate::error::{Error, Result};

const ALPHABET: &[u8; 85] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!#$%&()*+-;<=>?@^_`{|}~";

const INVALID: u8 = 0xFF;

const fn decode_table() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < ALPHABET.len() {
        table[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static DECODE: [u8; 256] = decode_table();

/// Encodes bytes as base85 text
pub fn encode(data: &[u8]) -> String {
    let mut out = String::with_capacity(data.len().div_ceil(4) * 5);

    for chunk in data.chunks(4) {
        let mut group = [0u8; 4];
        group[..chunk.len()].copy_from_slice(chunk);
        let mut value = u32::from_be_bytes(group);

        let mut digits = [0u8; 5];
        for digit in digits.iter_mut().rev() {
            *digit = ALPHABET[(value % 85) as usize];
            value /= 85;
        }

        for &digit in &digits[..chunk.len() + 1] {
            out.push(digit as char);
        }
    }

    out
}

/// Decodes base85 text back into bytes
pub fn decode(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() / 5 * 4 + 4);

    for (index, chunk) in bytes.chunks(5).enumerate() {
        if chunk.len() == 1 {
            return Err(Error::Codec(
                "Base85 text ends with a dangling character".to_string(),
            ));
        }

        let mut value: u64 = 0;
        for position in 0..5 {
            // Short final groups are padded with the highest digit
            let digit = match chunk.get(position) {
                Some(&c) => match DECODE[c as usize] {
                    INVALID => {
                        return Err(Error::Codec(format!(
                            "Invalid base85 character {:?} at position {}",
                            c as char,
                            index * 5 + position
                        )))
                    }
                    d => d,
                },
                None => 84,
            };
            value = value * 85 + digit as u64;
        }

        if value > u32::MAX as u64 {
            return Err(Error::Codec(format!(
                "Base85 group at position {} overflows",
                index * 5
            )));
        }

        let group = (value as u32).to_be_bytes();
        out.extend_from_slice(&group[..chunk.len() - 1]);
    }

    Ok(out)
}
