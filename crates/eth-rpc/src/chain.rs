//! A thin synchronous JSON-RPC façade over an EVM-compatible chain.

use std::sync::atomic::{AtomicU64, Ordering};

use chain_eth::account::Account;
use chain_eth::address::Address;
use chain_eth::bignumber::BigNumber;
use chain_eth::bytes;
use chain_eth::transaction::{self, TransactionProperties};
use serde_json::json;
use tracing::{debug, instrument};

use crate::error::RpcError;
use crate::jsonrpc::JsonRpcRequest;
use crate::transport::HttpTransport;

/// Handle to an EVM-compatible chain reachable over JSON-RPC.
///
/// Calls are blocking and sequential: this type holds no connection pool or
/// background tasks of its own, matching the single-request-at-a-time shape
/// of the HTTP transport it wraps.
pub struct Chain<T: HttpTransport> {
    url: String,
    transport: T,
    chain_id: Option<u32>,
    started: bool,
    request_id: AtomicU64,
}

impl<T: HttpTransport> Chain<T> {
    /// Builds a chain handle for `url` with a known `chain_id`, skipping the
    /// `eth_chainId` round trip that [`Chain::start`] would otherwise make.
    pub fn new(url: impl Into<String>, chain_id: u32, transport: T) -> Self {
        Chain {
            url: url.into(),
            transport,
            chain_id: Some(chain_id),
            started: false,
            request_id: AtomicU64::new(1),
        }
    }

    /// Builds a chain handle that will discover its chain ID via
    /// `eth_chainId` when [`Chain::start`] is called.
    pub fn discover(url: impl Into<String>, transport: T) -> Self {
        Chain {
            url: url.into(),
            transport,
            chain_id: None,
            started: false,
            request_id: AtomicU64::new(1),
        }
    }

    /// Marks the chain as ready for use, fetching the chain ID first if one
    /// was not supplied to [`Chain::new`].
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Result<(), RpcError> {
        if self.chain_id.is_none() {
            let id_hex: String = self.call_rpc("eth_chainId", json!([]))?;
            let id = BigNumber::parse_hex(&id_hex)?.to_u32()?;
            self.chain_id = Some(id);
        }
        self.started = true;
        debug!(chain_id = self.chain_id, "chain started");
        Ok(())
    }

    /// The chain ID, if known (set explicitly or discovered by `start`).
    pub fn chain_id(&self) -> Option<u32> {
        self.chain_id
    }

    pub fn started(&self) -> bool {
        self.started
    }

    fn assert_started(&self) -> Result<(), RpcError> {
        if self.started {
            Ok(())
        } else {
            Err(RpcError::NotStarted)
        }
    }

    /// Current network gas price, in wei.
    #[instrument(skip(self))]
    pub fn gas_price(&self) -> Result<BigNumber, RpcError> {
        let hex: String = self.call_rpc("eth_gasPrice", json!([]))?;
        Ok(BigNumber::parse_hex(&hex)?)
    }

    /// The ETH balance of `address`, in wei, at the `"latest"` block.
    #[instrument(skip(self))]
    pub fn balance(&self, address: Address) -> Result<BigNumber, RpcError> {
        let hex: String = self.call_rpc("eth_getBalance", json!([address.to_hex_lowercase(), "latest"]))?;
        Ok(BigNumber::parse_hex(&hex)?)
    }

    /// The number of transactions sent from `address`, used as the next
    /// nonce.
    #[instrument(skip(self))]
    pub fn transaction_count(&self, address: Address) -> Result<BigNumber, RpcError> {
        let hex: String = self.call_rpc(
            "eth_getTransactionCount",
            json!([address.to_hex_lowercase(), "latest"]),
        )?;
        Ok(BigNumber::parse_hex(&hex)?)
    }

    /// Executes a message call without creating a transaction, returning the
    /// raw return data.
    #[instrument(skip(self, data))]
    pub fn call(&self, from: Address, to: Address, data: &[u8]) -> Result<Vec<u8>, RpcError> {
        let call_object = json!({
            "from": from.to_hex_lowercase(),
            "to": to.to_hex_lowercase(),
            "data": bytes::add_hex_prefix(&bytes::to_hex(data).to_lowercase()),
        });

        let hex: String = self.call_rpc("eth_call", json!([call_object, "latest"]))?;
        Ok(bytes::from_hex(&hex)?)
    }

    /// Estimates the gas required for a transfer or contract call, without
    /// submitting it.
    #[instrument(skip(self, data))]
    pub fn estimate_gas(
        &self,
        from: Address,
        to: Address,
        value: &BigNumber,
        data: &[u8],
    ) -> Result<BigNumber, RpcError> {
        let call_object = json!({
            "from": from.to_hex_lowercase(),
            "to": to.to_hex_lowercase(),
            "value": bytes::add_hex_prefix(&bytes::to_hex(value.bytes()).to_lowercase()),
            "data": bytes::add_hex_prefix(&bytes::to_hex(data).to_lowercase()),
        });

        let hex: String = self.call_rpc("eth_estimateGas", json!([call_object]))?;
        Ok(BigNumber::parse_hex(&hex)?)
    }

    /// Broadcasts an already-signed raw transaction, returning its hash.
    #[instrument(skip(self, raw_tx_hex))]
    pub fn send_raw_transaction(&self, raw_tx_hex: &str) -> Result<String, RpcError> {
        self.call_rpc("eth_sendRawTransaction", json!([raw_tx_hex]))
    }

    /// The receipt for `transaction_hash`, or `None` if the transaction is
    /// still pending or unknown to the node.
    ///
    /// Returned as a raw JSON value rather than a typed struct: receipt shape
    /// varies across clients (e.g. post-merge fields, L2 extensions), and
    /// callers that need specific fields can pull them out directly.
    #[instrument(skip(self))]
    pub fn get_transaction_receipt(&self, transaction_hash: &str) -> Result<Option<serde_json::Value>, RpcError> {
        self.call_rpc_nullable("eth_getTransactionReceipt", json!([transaction_hash]))
    }

    /// The block identified by `block_hash`, or `None` if unknown to the
    /// node. `full_transactions` selects between transaction hashes and full
    /// transaction objects in the returned block's `transactions` field.
    #[instrument(skip(self))]
    pub fn get_block_information(
        &self,
        block_hash: &str,
        full_transactions: bool,
    ) -> Result<Option<serde_json::Value>, RpcError> {
        self.call_rpc_nullable("eth_getBlockByHash", json!([block_hash, full_transactions]))
    }

    /// Builds, signs, and broadcasts a legacy transaction.
    ///
    /// If `gas_price` is `None`, the current network gas price is fetched
    /// first. The nonce is always fetched fresh via
    /// [`Chain::transaction_count`].
    #[instrument(skip(self, from, data))]
    pub fn send(
        &self,
        from: &Account,
        to: Address,
        value: BigNumber,
        gas_limit: u32,
        gas_price: Option<BigNumber>,
        data: Vec<u8>,
    ) -> Result<String, RpcError> {
        self.assert_started()?;
        let chain_id = self.chain_id.ok_or(RpcError::NotStarted)?;

        let nonce = self
            .transaction_count(from.address())
            .map_err(|e| RpcError::NonceFetchFailed(Box::new(e)))?
            .to_u32()?;

        let gas_price = match gas_price {
            Some(p) => p,
            None => self.gas_price().map_err(|e| RpcError::GasPriceFetchFailed(Box::new(e)))?,
        };

        let properties = TransactionProperties::new_legacy(chain_id, nonce, gas_price, gas_limit);
        let unsigned = transaction::build_contract_call(properties, to, value, data);
        let signed = transaction::sign(&unsigned, from)?;

        self.send_raw_transaction(&signed.raw_hex())
    }

    fn call_rpc<R: serde::de::DeserializeOwned>(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> Result<R, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        let body = serde_json::to_value(&request).map_err(|_| RpcError::InvalidJson)?;

        let raw = self.transport.post_json(&self.url, &body)?;
        let response: crate::jsonrpc::JsonRpcResponse<R> =
            serde_json::from_str(&raw).map_err(|_| RpcError::InvalidJson)?;

        if let Some(error) = response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        response.result.ok_or(RpcError::MissingField("result"))
    }

    /// Like `call_rpc`, but for methods whose `result` is expected to be
    /// `null` on a miss (`eth_getTransactionReceipt`, `eth_getBlockByHash`).
    ///
    /// `JsonRpcResponse<Option<R>>::result` would collapse a JSON `null`
    /// into the *outer* `None` during deserialization (serde can't tell "no
    /// `result` field" from "`result: null`" once nested in an `Option<T>`),
    /// so `call_rpc`'s `ok_or(MissingField)` would misreport a null result as
    /// malformed. This method decodes the envelope generically over `R`
    /// directly and treats a missing/null result as `Ok(None)` rather than
    /// an error, once an RPC `error` object has been ruled out.
    fn call_rpc_nullable<R: serde::de::DeserializeOwned>(
        &self,
        method: &'static str,
        params: serde_json::Value,
    ) -> Result<Option<R>, RpcError> {
        let id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        let body = serde_json::to_value(&request).map_err(|_| RpcError::InvalidJson)?;

        let raw = self.transport.post_json(&self.url, &body)?;
        let response: crate::jsonrpc::JsonRpcResponse<R> =
            serde_json::from_str(&raw).map_err(|_| RpcError::InvalidJson)?;

        if let Some(error) = response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        Ok(response.result)
    }
}
