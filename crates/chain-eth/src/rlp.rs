//! Recursive Length Prefix encoding, as used by legacy Ethereum
//! transactions.

use crate::bytes::truncate_leading_zeros;
use crate::error::EthError;

/// A value that can be RLP-encoded: either a byte string or a nested list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    String(Vec<u8>),
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Wraps a byte slice as an RLP string item.
    pub fn string(bytes: impl Into<Vec<u8>>) -> Self {
        RlpItem::String(bytes.into())
    }

    /// Wraps a `u64` as its minimal big-endian RLP string item.
    pub fn uint(value: u64) -> Self {
        RlpItem::String(truncate_leading_zeros(&value.to_be_bytes()))
    }

    /// Builds an RLP list item from its elements.
    pub fn list(items: Vec<RlpItem>) -> Self {
        RlpItem::List(items)
    }
}

/// Encodes a single RLP item, recursing into nested lists.
pub fn encode(item: &RlpItem) -> Result<Vec<u8>, EthError> {
    match item {
        RlpItem::String(bytes) => encode_string(bytes),
        RlpItem::List(items) => {
            let mut payload = Vec::new();
            for inner in items {
                payload.extend(encode(inner)?);
            }
            encode_length_prefix(0xc0, 0xf7, payload.len())
                .map(|mut prefix| {
                    prefix.extend(payload);
                    prefix
                })
        }
    }
}

fn encode_string(bytes: &[u8]) -> Result<Vec<u8>, EthError> {
    if bytes.len() == 1 && bytes[0] < 0x80 {
        return Ok(vec![bytes[0]]);
    }

    let mut out = encode_length_prefix(0x80, 0xb7, bytes.len())?;
    out.extend_from_slice(bytes);
    Ok(out)
}

/// Emits the prefix byte(s) for a string or list of `len` payload bytes.
///
/// `short_base` is the prefix for payloads of 0-55 bytes (`0x80` for
/// strings, `0xc0` for lists); `long_base` is the prefix preceding the
/// length-of-length byte for longer payloads (`0xb7`/`0xf7`).
fn encode_length_prefix(short_base: u8, long_base: u8, len: usize) -> Result<Vec<u8>, EthError> {
    if len <= 55 {
        return Ok(vec![short_base + len as u8]);
    }

    let len_bytes = truncate_leading_zeros(&(len as u64).to_be_bytes());
    if len_bytes.len() > 8 {
        return Err(EthError::RlpTooLong);
    }

    let mut out = vec![long_base + len_bytes.len() as u8];
    out.extend(len_bytes);
    Ok(out)
}
