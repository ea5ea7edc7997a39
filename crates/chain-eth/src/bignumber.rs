//! Non-negative arbitrary-precision integer used for wei amounts, gas
//! prices, and other values too large for a `u64`.

use crate::bytes::{self, truncate_leading_zeros};
use crate::error::EthError;

/// A non-negative arbitrary-precision integer.
///
/// Stored as a minimal big-endian byte vector; an empty vector represents
/// zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigNumber {
    bytes: Vec<u8>,
}

impl BigNumber {
    /// The value zero.
    pub fn zero() -> Self {
        BigNumber { bytes: Vec::new() }
    }

    /// Parses a hex string, with or without a `0x`/`0X` prefix, whitespace
    /// tolerant.
    pub fn parse_hex(s: &str) -> Result<Self, EthError> {
        let bytes = bytes::from_hex(s)?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Builds a `BigNumber` from a `u32`.
    pub fn from_u32(value: u32) -> Self {
        Self::from_bytes(&value.to_be_bytes())
    }

    /// Builds a `BigNumber` from a `u64`.
    pub fn from_u64(value: u64) -> Self {
        Self::from_bytes(&value.to_be_bytes())
    }

    /// Builds a `BigNumber` from a big-endian byte slice (leading zeros are
    /// tolerated and stripped).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        BigNumber {
            bytes: truncate_leading_zeros(bytes),
        }
    }

    /// The minimal big-endian byte representation.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Uppercase hex of the minimal byte form, no `0x` prefix.
    pub fn hex_string(&self) -> String {
        bytes::to_hex(&self.bytes)
    }

    /// Returns the value as a `u32`, or `Error::Overflow` if it does not fit.
    pub fn to_u32(&self) -> Result<u32, EthError> {
        if self.bytes.len() > 4 {
            return Err(EthError::Overflow(format!(
                "value with {} bytes does not fit in u32",
                self.bytes.len()
            )));
        }
        let mut buf = [0u8; 4];
        buf[4 - self.bytes.len()..].copy_from_slice(&self.bytes);
        Ok(u32::from_be_bytes(buf))
    }

    /// Returns the value as a `u64`, or `Error::Overflow` if it does not fit.
    pub fn to_u64(&self) -> Result<u64, EthError> {
        if self.bytes.len() > 8 {
            return Err(EthError::Overflow(format!(
                "value with {} bytes does not fit in u64",
                self.bytes.len()
            )));
        }
        let mut buf = [0u8; 8];
        buf[8 - self.bytes.len()..].copy_from_slice(&self.bytes);
        Ok(u64::from_be_bytes(buf))
    }

    /// Base-10 textual representation, no leading zeros except for `"0"`.
    pub fn decimal_string(&self) -> String {
        if self.bytes.is_empty() {
            return "0".to_string();
        }

        // Repeated divide-by-10 over the big-endian byte vector, collecting
        // remainders least-significant digit first.
        let mut digits = Vec::new();
        let mut current = self.bytes.clone();

        while !current.is_empty() {
            let mut remainder: u32 = 0;
            let mut quotient = Vec::with_capacity(current.len());

            for &byte in &current {
                let acc = (remainder << 8) | byte as u32;
                let q = acc / 10;
                remainder = acc % 10;
                quotient.push(q as u8);
            }

            digits.push(b'0' + remainder as u8);
            current = truncate_leading_zeros(&quotient);
        }

        digits.reverse();
        String::from_utf8(digits).expect("digits are all ASCII")
    }

    /// Parses a base-10 decimal string (no leading `+`/`-`, digits only).
    pub fn parse_decimal(s: &str) -> Result<Self, EthError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(EthError::InvalidHex(format!(
                "not a decimal integer: {s}"
            )));
        }

        let mut value = BigNumber::zero();
        let ten = BigNumber::from_u32(10);
        for ch in s.chars() {
            let digit = BigNumber::from_u32(ch.to_digit(10).expect("ascii digit"));
            value = value.checked_mul(&ten).checked_add(&digit);
        }
        Ok(value)
    }

    fn checked_add(&self, other: &BigNumber) -> BigNumber {
        let mut result = Vec::with_capacity(self.bytes.len().max(other.bytes.len()) + 1);
        let mut carry: u16 = 0;
        let mut a = self.bytes.iter().rev();
        let mut b = other.bytes.iter().rev();

        loop {
            let x = a.next();
            let y = b.next();
            if x.is_none() && y.is_none() && carry == 0 {
                break;
            }
            let sum = carry + *x.unwrap_or(&0) as u16 + *y.unwrap_or(&0) as u16;
            result.push((sum & 0xFF) as u8);
            carry = sum >> 8;
        }

        result.reverse();
        BigNumber::from_bytes(&result)
    }

    fn checked_mul(&self, other: &BigNumber) -> BigNumber {
        if self.bytes.is_empty() || other.bytes.is_empty() {
            return BigNumber::zero();
        }

        let mut result = vec![0u16; self.bytes.len() + other.bytes.len()];
        for (i, &a) in self.bytes.iter().rev().enumerate() {
            let mut carry: u32 = 0;
            for (j, &b) in other.bytes.iter().rev().enumerate() {
                let idx = i + j;
                let product = a as u32 * b as u32 + result[idx] as u32 + carry;
                result[idx] = (product & 0xFF) as u16;
                carry = product >> 8;
            }
            let mut k = i + other.bytes.len();
            while carry > 0 {
                let sum = result[k] as u32 + carry;
                result[k] = (sum & 0xFF) as u16;
                carry = sum >> 8;
                k += 1;
            }
        }

        let bytes: Vec<u8> = result.into_iter().rev().map(|x| x as u8).collect();
        BigNumber::from_bytes(&bytes)
    }
}

impl std::fmt::Display for BigNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.decimal_string())
    }
}
