//! JSON-RPC transport used to reach the chain node.
//!
//! - [`HttpTransportClient`]: generic JSON-RPC over HTTP with retries
//! - [`EVMTransportClient`]: EVM flavoured wrapper around the HTTP client

mod evm {
	pub mod http;
}

mod error;
mod http;

pub use error::TransportError;
pub use evm::http::EVMTransportClient;
pub use http::HttpTransportClient;

use reqwest::StatusCode;
use reqwest_retry::{
	default_on_request_failure, default_on_request_success, Retryable, RetryableStrategy,
};
use serde::Serialize;
use serde_json::{json, Value};

/// Statuses that fail the call at once instead of being retried by the middleware.
/// A rate limited node is given room until the next polling tick.
pub const FAIL_FAST_STATUS_CODES: [StatusCode; 1] = [StatusCode::TOO_MANY_REQUESTS];

/// Common interface of the JSON-RPC transports
#[async_trait::async_trait]
pub trait BlockchainTransport: Send + Sync {
	/// URL requests are sent to
	async fn get_current_url(&self) -> String;

	/// Sends a JSON-RPC call and returns the full response object
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize;

	/// Builds the JSON-RPC 2.0 envelope for a call
	async fn customize_request<P>(&self, method: &str, params: Option<P>) -> Value
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		json!({
			"jsonrpc": "2.0",
			"id": 1,
			"method": method,
			"params": params.map(|p| p.into())
		})
	}
}

/// Retries connection failures and server errors, but never a rate limit response.
pub struct TransientErrorRetryStrategy;

impl RetryableStrategy for TransientErrorRetryStrategy {
	fn handle(
		&self,
		res: &Result<reqwest::Response, reqwest_middleware::Error>,
	) -> Option<Retryable> {
		match res {
			Ok(response) if FAIL_FAST_STATUS_CODES.contains(&response.status()) => {
				Some(Retryable::Fatal)
			}
			Ok(response) => default_on_request_success(response),
			Err(error) => default_on_request_failure(error),
		}
	}
}
