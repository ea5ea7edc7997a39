//! HTTP transport abstraction for issuing JSON-RPC request bodies.
//!
//! [`Chain`](crate::Chain) only depends on the [`HttpTransport`] trait, not
//! on `reqwest` directly, so tests can substitute [`FakeTransport`] for a
//! real network call.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::error::RpcError;

/// Sends a JSON-RPC request body to `url` over HTTP and returns the raw
/// response body.
pub trait HttpTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String, RpcError>;
}

/// Blocking `reqwest`-backed transport, used outside of tests.
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Builds a transport with a 30-second request timeout.
    pub fn new() -> Self {
        ReqwestTransport {
            client: reqwest::blocking::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client configuration is valid"),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<String, RpcError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .map_err(|_| RpcError::Transport(0))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Transport(status.as_u16()));
        }

        response.text().map_err(|_| RpcError::InvalidJson)
    }
}

/// A queue of canned responses, consumed in order, for exercising
/// [`Chain`](crate::Chain) without a network.
pub struct FakeTransport {
    responses: RefCell<VecDeque<Result<String, RpcError>>>,
    requests: RefCell<Vec<serde_json::Value>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        FakeTransport {
            responses: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
        }
    }

    /// Queues a successful raw response body to be returned on the next call.
    pub fn push_ok(&self, body: impl Into<String>) {
        self.responses.borrow_mut().push_back(Ok(body.into()));
    }

    /// Queues a transport-level failure to be returned on the next call.
    pub fn push_err(&self, err: RpcError) {
        self.responses.borrow_mut().push_back(Err(err));
    }

    /// The request bodies sent so far, in order.
    pub fn requests(&self) -> Vec<serde_json::Value> {
        self.requests.borrow().clone()
    }
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport for FakeTransport {
    fn post_json(&self, _url: &str, body: &serde_json::Value) -> Result<String, RpcError> {
        self.requests.borrow_mut().push(body.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(RpcError::Transport(0)))
    }
}
