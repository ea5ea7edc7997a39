//! A blocking JSON-RPC client for EVM-compatible chains.
//!
//! [`Chain`] is the main entry point: it wraps an [`HttpTransport`] and
//! exposes the handful of `eth_*` methods needed to read chain state and
//! broadcast transactions built and signed with `chain-eth`.

pub mod chain;
pub mod error;
pub mod jsonrpc;
pub mod transport;

pub use chain::Chain;
pub use error::RpcError;
pub use transport::{HttpTransport, ReqwestTransport};
