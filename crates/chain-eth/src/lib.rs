//! Ethereum/EVM chain support: address derivation, ABI/RLP encoding, and
//! legacy (EIP-155) transaction assembly and signing.
//!
//! This crate provides:
//! - Ethereum address derivation from secp256k1 public keys (with EIP-55 checksums)
//! - A hand-rolled Solidity ABI encoder and RLP encoder (the bit-exact core
//!   this crate exists to get right)
//! - Legacy and gated EIP-1559 transaction building and signing
//! - ERC-20 token interaction encoding (transfer, approve, balanceOf)
//! - Multi-chain EVM network definitions

pub mod abi;
pub mod account;
pub mod address;
pub mod bignumber;
pub mod bytes;
pub mod chains;
pub mod contract;
pub mod encodable;
pub mod erc20;
pub mod error;
pub mod rlp;
pub mod transaction;
