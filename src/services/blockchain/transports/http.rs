//! HTTP transport for JSON-RPC calls.
//!
//! Requests go through a retrying `reqwest` client (see [`TransientErrorRetryStrategy`]).
//! Non-success statuses are returned as [`TransportError::Http`] without decoding the body
//! as JSON.

use anyhow::Context;
use async_trait::async_trait;
use reqwest_middleware::ClientWithMiddleware;
use serde::Serialize;
use serde_json::Value;
use std::{collections::HashMap, time::Duration};
use url::Url;

use crate::{
	services::blockchain::transports::{
		BlockchainTransport, TransientErrorRetryStrategy, TransportError,
	},
	utils::http::{create_retryable_http_client, RetryConfig},
};

/// JSON-RPC over HTTP bound to a single node URL
#[derive(Clone, Debug)]
pub struct HttpTransportClient {
	/// Retrying HTTP client
	pub client: ClientWithMiddleware,
	url: String,
}

impl HttpTransportClient {
	/// Creates a transport for `rpc_url`.
	///
	/// No request is made here; an unreachable node surfaces as failed ticks later.
	///
	/// # Arguments
	/// * `rpc_url` - Node endpoint, must be an http(s) URL
	/// * `retry_config` - Backoff settings for transient failures
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - The transport or a URL / client build error
	pub fn new(rpc_url: &str, retry_config: &RetryConfig) -> Result<Self, anyhow::Error> {
		let url = Url::parse(rpc_url).with_context(|| format!("Invalid RPC URL: {}", rpc_url))?;

		let base_client = reqwest::ClientBuilder::new()
			.pool_idle_timeout(Duration::from_secs(90))
			.pool_max_idle_per_host(32)
			.timeout(Duration::from_secs(30))
			.connect_timeout(Duration::from_secs(20))
			.build()
			.context("Failed to create base HTTP client")?;

		let client = create_retryable_http_client(
			retry_config,
			base_client,
			Some(TransientErrorRetryStrategy),
		);

		Ok(Self::with_client(client, url.as_str()))
	}

	/// Wraps an already built client.
	pub fn with_client(client: ClientWithMiddleware, url: &str) -> Self {
		Self {
			client,
			url: url.trim_end_matches('/').to_string(),
		}
	}
}

#[async_trait]
impl BlockchainTransport for HttpTransportClient {
	async fn get_current_url(&self) -> String {
		self.url.clone()
	}

	/// Posts a JSON-RPC envelope and decodes the response.
	///
	/// # Returns
	/// * `Result<Value, TransportError>` - The decoded response object. HTTP error statuses
	///   (including 429) become [`TransportError::Http`]
	async fn send_raw_request<P>(
		&self,
		method: &str,
		params: Option<P>,
	) -> Result<Value, TransportError>
	where
		P: Into<Value> + Send + Clone + Serialize,
	{
		let metadata = || {
			Some(HashMap::from([
				("method".to_string(), method.to_string()),
				("url".to_string(), self.url.clone()),
			]))
		};

		let request_body = self.customize_request(method, params).await;
		let request_body = serde_json::to_string(&request_body).map_err(|e| {
			TransportError::request_serialization(
				"Failed to serialize request JSON",
				Some(Box::new(e)),
				metadata(),
			)
		})?;

		let response = self
			.client
			.post(&self.url)
			.header("Content-Type", "application/json")
			.body(request_body)
			.send()
			.await
			.map_err(|e| TransportError::network(e.to_string(), Some(Box::new(e)), metadata()))?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			tracing::warn!(%status, method, url = %self.url, "JSON-RPC request rejected");
			return Err(TransportError::http(
				status,
				self.url.clone(),
				body,
				None,
				metadata(),
			));
		}

		response.json().await.map_err(|e| {
			TransportError::response_parse(
				"Failed to parse JSON response",
				Some(Box::new(e)),
				metadata(),
			)
		})
	}
}
