use k256::elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use k256::{EncodedPoint, PublicKey};
use sha3::{Digest, Keccak256};

use crate::error::EthError;

/// A 20-byte Ethereum account address.
///
/// Its `Display` implementation is the canonical lowercase `0x`-prefixed
/// form; use [`checksum_address`] when an EIP-55 checksummed rendering is
/// needed instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address([u8; 20]);

impl Address {
    /// Wraps a raw 20-byte address.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Builds an address from the last 20 bytes of a longer byte slice (for
    /// example a 32-byte hash), the way an address is carved out of a
    /// Keccak-256 digest or a padded ABI word.
    pub fn from_trailing_bytes(raw: &[u8]) -> Result<Self, EthError> {
        if raw.len() < 20 {
            return Err(EthError::InvalidAddress(format!(
                "expected at least 20 bytes, got {}",
                raw.len()
            )));
        }

        let mut out = [0u8; 20];
        out.copy_from_slice(&raw[raw.len() - 20..]);
        Ok(Address(out))
    }

    /// Parses an address from a hex string, case-insensitively and without
    /// checksum validation. Accepts both the `0x`/`0X`-prefixed 42-character
    /// form and the bare 40-character form.
    pub fn parse(s: &str) -> Result<Self, EthError> {
        let hex_part = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);

        if hex_part.len() != 40 {
            return Err(EthError::InvalidAddress(format!(
                "expected 40 hex characters, got {}",
                hex_part.len()
            )));
        }

        let decoded = hex::decode(hex_part)
            .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;

        let mut out = [0u8; 20];
        out.copy_from_slice(&decoded);
        Ok(Address(out))
    }

    /// Derives an address from an uncompressed secp256k1 public key (65
    /// bytes, starting with `0x04`).
    pub fn from_uncompressed_pubkey(uncompressed_pubkey: &[u8; 65]) -> Result<Self, EthError> {
        if uncompressed_pubkey[0] != 0x04 {
            return Err(EthError::InvalidPublicKey(
                "uncompressed key must start with 0x04".into(),
            ));
        }

        let hash = Keccak256::digest(&uncompressed_pubkey[1..]);
        let mut addr_bytes = [0u8; 20];
        addr_bytes.copy_from_slice(&hash[12..]);
        Ok(Address(addr_bytes))
    }

    /// Derives an address from a compressed secp256k1 public key (33 bytes).
    pub fn from_compressed_pubkey(pubkey_33_bytes: &[u8; 33]) -> Result<Self, EthError> {
        let encoded = EncodedPoint::from_bytes(pubkey_33_bytes).map_err(|e| {
            EthError::InvalidPublicKey(format!("invalid compressed key encoding: {e}"))
        })?;

        let pubkey: Option<PublicKey> = PublicKey::from_encoded_point(&encoded).into();
        let pubkey = pubkey
            .ok_or_else(|| EthError::InvalidPublicKey("point is not on the secp256k1 curve".into()))?;

        let uncompressed = pubkey.to_encoded_point(false);
        let uncompressed_bytes: &[u8] = uncompressed.as_bytes();

        let mut key_65 = [0u8; 65];
        key_65.copy_from_slice(uncompressed_bytes);

        Self::from_uncompressed_pubkey(&key_65)
    }

    /// The raw 20-byte address.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Lowercase `0x`-prefixed hex form. Identical to the `Display` output;
    /// kept as an explicit method for call sites that want to be clear they
    /// don't want a checksummed form.
    pub fn to_hex_lowercase(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 mixed-case checksummed hex form.
    pub fn to_checksummed(&self) -> String {
        checksum_address(&self.to_hex_lowercase()).expect("valid address bytes")
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex_lowercase())
    }
}

/// Derives the lowercase hex Ethereum address string from an uncompressed
/// secp256k1 public key (65 bytes, starting with 0x04).
pub fn pubkey_to_eth_address(uncompressed_pubkey: &[u8; 65]) -> Result<String, EthError> {
    Address::from_uncompressed_pubkey(uncompressed_pubkey).map(|a| a.to_string())
}

/// Derives the lowercase hex Ethereum address string from a compressed
/// secp256k1 public key (33 bytes).
pub fn pubkey_bytes_to_eth_address(pubkey_33_bytes: &[u8; 33]) -> Result<String, EthError> {
    Address::from_compressed_pubkey(pubkey_33_bytes).map(|a| a.to_string())
}

/// Validates an Ethereum address string.
///
/// Checks that the address has the correct format (0x + 40 hex characters).
/// If the address contains mixed case, the EIP-55 checksum is verified.
pub fn validate_address(address: &str) -> Result<bool, EthError> {
    if !address.starts_with("0x") && !address.starts_with("0X") {
        return Err(EthError::InvalidAddress(
            "address must start with 0x".into(),
        ));
    }

    let hex_part = &address[2..];

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    let is_all_lower = hex_part.chars().all(|c| !c.is_ascii_uppercase());
    let is_all_upper = hex_part.chars().all(|c| !c.is_ascii_lowercase());

    if is_all_lower || is_all_upper {
        return Ok(true);
    }

    let checksummed = checksum_address(&format!("0x{}", hex_part.to_lowercase()))?;
    Ok(checksummed == address)
}

/// Applies EIP-55 mixed-case checksum encoding to an Ethereum address.
///
/// The input should be a lowercase 0x-prefixed address. Returns the
/// checksummed version.
pub fn checksum_address(address: &str) -> Result<String, EthError> {
    if !address.starts_with("0x") && !address.starts_with("0X") {
        return Err(EthError::InvalidAddress(
            "address must start with 0x".into(),
        ));
    }

    let hex_part = address[2..].to_lowercase();

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    let hash = Keccak256::digest(hex_part.as_bytes());
    let hash_hex = hex::encode(hash);

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");

    for (i, c) in hex_part.chars().enumerate() {
        if c.is_ascii_digit() {
            checksummed.push(c);
        } else {
            let hash_nibble = u8::from_str_radix(&hash_hex[i..i + 1], 16).unwrap_or(0);
            if hash_nibble >= 8 {
                checksummed.push(c.to_ascii_uppercase());
            } else {
                checksummed.push(c);
            }
        }
    }

    Ok(checksummed)
}
