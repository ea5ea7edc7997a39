//! Tagged values accepted by the Solidity ABI encoder.

use crate::bignumber::BigNumber;

/// The Solidity type handle used when a value is ambiguous between two wire
/// encodings (currently only `bool`, which this crate defaults to encoding
/// as `"bool"` but can opt into `"uint8"`-compatible encoding for contracts
/// that declare the parameter that way).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolHandle {
    Bool,
    Uint8,
}

/// A value ready to be ABI-encoded as a function argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodableItem {
    /// `uintN`/`intN` family, represented as an unsigned big integer.
    UInt(BigNumber),
    /// `bool`, tagged with the wire handle to use.
    Bool(bool, BoolHandle),
    /// `address`, as its 20-byte form.
    Address([u8; 20]),
    /// `string`, UTF-8 text (dynamic).
    String(String),
    /// `bytes`, arbitrary byte data (dynamic).
    Bytes(Vec<u8>),
    /// `bytes32` and other fixed-size byte arrays, right-padded to 32 bytes.
    FixedBytes(Vec<u8>),
    /// `T[]`, a dynamic array of homogeneous items.
    Array(Vec<EncodableItem>),
}

impl EncodableItem {
    /// Convenience constructor for a `bool` encoded using the `"bool"` ABI
    /// type (the default).
    pub fn bool_value(value: bool) -> Self {
        EncodableItem::Bool(value, BoolHandle::Bool)
    }

    /// Constructs a `bool` with an explicit wire handle.
    pub fn bool_value_with_handle(value: bool, handle: BoolHandle) -> Self {
        EncodableItem::Bool(value, handle)
    }

    /// The Solidity type name this item is encoded as.
    pub fn solidity_type(&self) -> &'static str {
        match self {
            EncodableItem::UInt(_) => "uint256",
            EncodableItem::Bool(_, BoolHandle::Bool) => "bool",
            EncodableItem::Bool(_, BoolHandle::Uint8) => "uint8",
            EncodableItem::Address(_) => "address",
            EncodableItem::String(_) => "string",
            EncodableItem::Bytes(_) => "bytes",
            EncodableItem::FixedBytes(_) => "bytes32",
            EncodableItem::Array(_) => "array",
        }
    }

    /// Whether this item occupies a dynamic (offset-indirected) slot in the
    /// ABI head/tail layout.
    pub fn is_dynamic(&self) -> bool {
        matches!(
            self,
            EncodableItem::String(_) | EncodableItem::Bytes(_) | EncodableItem::Array(_)
        )
    }
}
