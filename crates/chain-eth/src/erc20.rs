//! Convenience wrappers around [`crate::contract::ContractCall`] for the
//! three ERC-20 operations this crate cares about.

use crate::address::Address;
use crate::bignumber::BigNumber;
use crate::contract::{self, ContractCall};
use crate::error::EthError;

/// Builds the calldata for `transfer(address,uint256)`.
pub fn encode_transfer(token: Address, to: Address, amount: BigNumber) -> Result<Vec<u8>, EthError> {
    ContractCall::erc20_transfer(token, to, amount).as_data()
}

/// Builds the calldata for `approve(address,uint256)`.
pub fn encode_approve(token: Address, spender: Address, amount: BigNumber) -> Result<Vec<u8>, EthError> {
    ContractCall::erc20_approve(token, spender, amount).as_data()
}

/// Builds the calldata for `balanceOf(address)`.
pub fn encode_balance_of(token: Address, owner: Address) -> Result<Vec<u8>, EthError> {
    ContractCall::erc20_balance_of(token, owner).as_data()
}

/// Decodes a `uint256` return value, as returned by `balanceOf`.
pub fn decode_uint256(data: &[u8]) -> Result<BigNumber, EthError> {
    contract::decode_uint256(data)
}
