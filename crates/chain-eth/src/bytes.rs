//! Byte-vector and hex-string primitives shared by the ABI, RLP, and
//! big-number encoders.

use crate::error::EthError;

/// Removes leading `0x00` bytes. Returns an empty vector if `bs` is all zero.
pub fn truncate_leading_zeros(bs: &[u8]) -> Vec<u8> {
    let start = bs.iter().position(|&b| b != 0).unwrap_or(bs.len());
    bs[start..].to_vec()
}

/// Encodes `bs` as uppercase hex with no `0x` prefix, two characters per byte.
pub fn to_hex(bs: &[u8]) -> String {
    hex::encode_upper(bs)
}

/// Decodes a hex string into bytes.
///
/// Accepts an optional `0x`/`0X` prefix and surrounding whitespace. Rejects
/// non-hex digits and odd-length input.
pub fn from_hex(s: &str) -> Result<Vec<u8>, EthError> {
    let trimmed = s.trim();
    let stripped = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if stripped.len() % 2 != 0 {
        return Err(EthError::InvalidHex(format!(
            "odd-length hex string: {stripped}"
        )));
    }

    hex::decode(stripped).map_err(|e| EthError::InvalidHex(e.to_string()))
}

/// Minimal big-endian encoding of a `u64`, with leading zero bytes stripped.
pub fn u64_to_bytes_be(x: u64) -> Vec<u8> {
    truncate_leading_zeros(&x.to_be_bytes())
}

/// Minimal big-endian encoding of a `usize` length value.
pub fn size_to_bytes_be(x: usize) -> Vec<u8> {
    truncate_leading_zeros(&(x as u64).to_be_bytes())
}

/// Prepends `"0x"` to a hex string.
pub fn add_hex_prefix(s: &str) -> String {
    format!("0x{s}")
}
