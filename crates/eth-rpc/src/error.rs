use thiserror::Error;

/// Errors surfaced by the JSON-RPC transport and the [`crate::Chain`] façade.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("chain has not been started")]
    NotStarted,

    #[error("transport error (HTTP {0})")]
    Transport(u16),

    #[error("response body is not valid JSON")]
    InvalidJson,

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("failed to fetch nonce before sending: {0}")]
    NonceFetchFailed(Box<RpcError>),

    #[error("failed to fetch gas price before sending: {0}")]
    GasPriceFetchFailed(Box<RpcError>),

    #[error("response missing expected field: {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Encoding(#[from] chain_eth::error::EthError),
}
