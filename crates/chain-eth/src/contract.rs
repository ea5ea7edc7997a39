//! Contract call assembly: turns a function signature and a list of
//! [`EncodableItem`] arguments into ABI-encoded calldata.

use std::cell::OnceCell;

use sha3::{Digest, Keccak256};

use crate::abi;
use crate::address::Address;
use crate::bignumber::BigNumber;
use crate::encodable::EncodableItem;
use crate::error::EthError;

const TRANSFER_SIGNATURE: &str = "transfer(address,uint256)";
const APPROVE_SIGNATURE: &str = "approve(address,uint256)";
const BALANCE_OF_SIGNATURE: &str = "balanceOf(address)";

/// A pending call to a contract function: a target address, a Solidity
/// function signature, and its arguments.
///
/// The 4-byte function selector is the first four bytes of the Keccak-256
/// hash of the signature; it is computed once per call and cached.
pub struct ContractCall {
    pub to: Address,
    function_signature: String,
    pub args: Vec<EncodableItem>,
    selector_cache: OnceCell<[u8; 4]>,
}

impl ContractCall {
    /// Builds a call to `function_signature` (e.g. `"transfer(address,uint256)"`)
    /// with the given arguments.
    pub fn new(to: Address, function_signature: impl Into<String>, args: Vec<EncodableItem>) -> Self {
        ContractCall {
            to,
            function_signature: function_signature.into(),
            args,
            selector_cache: OnceCell::new(),
        }
    }

    /// The Solidity function signature this call targets.
    pub fn function_signature(&self) -> &str {
        &self.function_signature
    }

    /// The 4-byte function selector, computed and cached on first access.
    pub fn selector(&self) -> [u8; 4] {
        *self.selector_cache.get_or_init(|| {
            let hash = Keccak256::digest(self.function_signature.as_bytes());
            let mut selector = [0u8; 4];
            selector.copy_from_slice(&hash[..4]);
            selector
        })
    }

    /// Assembles the complete calldata: selector followed by the head/tail
    /// ABI encoding of [`Self::args`].
    pub fn as_data(&self) -> Result<Vec<u8>, EthError> {
        abi::encode_function_call(self.selector(), &self.args)
    }

    /// Builds an ERC-20 `transfer(address,uint256)` call.
    pub fn erc20_transfer(token: Address, to: Address, amount: BigNumber) -> Self {
        ContractCall::new(
            token,
            TRANSFER_SIGNATURE,
            vec![EncodableItem::Address(*to.as_bytes()), EncodableItem::UInt(amount)],
        )
    }

    /// Builds an ERC-20 `approve(address,uint256)` call.
    pub fn erc20_approve(token: Address, spender: Address, amount: BigNumber) -> Self {
        ContractCall::new(
            token,
            APPROVE_SIGNATURE,
            vec![EncodableItem::Address(*spender.as_bytes()), EncodableItem::UInt(amount)],
        )
    }

    /// Builds an ERC-20 `balanceOf(address)` call.
    pub fn erc20_balance_of(token: Address, owner: Address) -> Self {
        ContractCall::new(
            token,
            BALANCE_OF_SIGNATURE,
            vec![EncodableItem::Address(*owner.as_bytes())],
        )
    }
}

/// Decodes a single `uint256` return value from ABI-encoded response data,
/// as returned by `balanceOf` and similar view functions.
pub fn decode_uint256(data: &[u8]) -> Result<BigNumber, EthError> {
    if data.len() < 32 {
        return Err(EthError::EncodingError(format!(
            "expected at least 32 bytes for uint256, got {}",
            data.len()
        )));
    }

    Ok(BigNumber::from_bytes(&data[..32]))
}
