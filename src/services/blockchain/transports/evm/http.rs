//! EVM transport: the generic HTTP transport pointed at an Ethereum JSON-RPC node.

use serde::Serialize;
use serde_json::Value;

use crate::{
	services::blockchain::transports::{BlockchainTransport, HttpTransportClient, TransportError},
	utils::http::RetryConfig,
};

/// Transport for `eth_*` JSON-RPC calls
#[derive(Clone, Debug)]
pub struct EVMTransportClient {
	/// Underlying HTTP transport
	pub http_client: HttpTransportClient,
}

impl EVMTransportClient {
	/// Creates a transport for the node at `rpc_url`.
	///
	/// # Arguments
	/// * `rpc_url` - Node endpoint
	/// * `retry_config` - Retry settings for the HTTP client
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - The transport or a build error
	pub fn new(rpc_url: &str, retry_config: &RetryConfig) -> Result<Self, anyhow::Error> {
		let http_client = HttpTransportClient::new(rpc_url, retry_config)?;
		Ok(Self { http_client })
	}
}

#[async_trait::async_trait]
impl BlockchainTransport for EVMTransportClient {
	async fn get_current_url(&self) -> String {
		self.http_client.get_current_url().await
	}

	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		self.http_client.send_raw_request(method, params).await
	}
}
