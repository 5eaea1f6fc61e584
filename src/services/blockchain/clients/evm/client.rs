//! Ethereum JSON-RPC block source.
//!
//! Uses `eth_blockNumber` for the head and `eth_getBlockByNumber` with full transaction
//! objects for block contents.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::instrument;

use crate::{
	models::{Block, ParserConfig},
	services::blockchain::{
		client::BlockSource,
		transports::{BlockchainTransport, EVMTransportClient},
		BlockChainError,
	},
	utils::parse_hex_quantity,
};

/// Block source backed by an EVM JSON-RPC node
#[derive(Clone)]
pub struct EvmClient<T: Send + Sync + Clone> {
	http_client: T,
}

impl<T: Send + Sync + Clone> EvmClient<T> {
	/// Creates a client over an existing transport
	pub fn new_with_transport(http_client: T) -> Self {
		Self { http_client }
	}

	pub fn transport(&self) -> &T {
		&self.http_client
	}
}

impl EvmClient<EVMTransportClient> {
	/// Creates a client for the node configured in `config`
	///
	/// # Arguments
	/// * `config` - Parser configuration carrying the RPC URL and retry policy
	///
	/// # Returns
	/// * `Result<Self, anyhow::Error>` - New client or a transport build error
	pub fn new(config: &ParserConfig) -> Result<Self, anyhow::Error> {
		let transport = EVMTransportClient::new(&config.rpc_url, &config.http_retry)?;
		Ok(Self::new_with_transport(transport))
	}
}

fn block_metadata(block_number: u64) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"block".to_string(),
		block_number.to_string(),
	)]))
}

/// Extracts `result` from a JSON-RPC response, turning an `error` member into a request
/// error.
fn extract_result(response: &Value, msg: &str) -> Result<Value, BlockChainError> {
	if let Some(error) = response.get("error") {
		return Err(BlockChainError::request_error(
			format!("{}: node returned error {}", msg, error),
			None,
			None,
		));
	}

	response.get("result").cloned().ok_or_else(|| {
		BlockChainError::request_error(format!("{}: missing 'result' field", msg), None, None)
	})
}

#[async_trait]
impl<T: Send + Sync + Clone + BlockchainTransport> BlockSource for EvmClient<T> {
	#[instrument(skip(self))]
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError> {
		let msg = "Failed to get latest block number";
		let response = self
			.http_client
			.send_raw_request("eth_blockNumber", Some(json!([])))
			.await
			.map_err(|e| BlockChainError::from_transport(msg, e))?;

		let result = extract_result(&response, msg)?;
		let hex_str = result.as_str().ok_or_else(|| {
			BlockChainError::request_error(
				format!("{}: expected hex string, got {}", msg, result),
				None,
				None,
			)
		})?;

		parse_hex_quantity(hex_str)
			.map_err(|e| BlockChainError::request_error(format!("{}: {}", msg, e), None, None))
	}

	#[instrument(skip(self))]
	async fn get_block(&self, block_number: u64) -> Result<Block, BlockChainError> {
		let msg = format!("Failed to get block {}", block_number);
		let params = json!([format!("0x{:x}", block_number), true]);

		let response = self
			.http_client
			.send_raw_request("eth_getBlockByNumber", Some(params))
			.await
			.map_err(|e| BlockChainError::from_transport(msg.as_str(), e))?;

		let block_data = extract_result(&response, &msg)?;
		if block_data.is_null() {
			return Err(BlockChainError::block_not_found(
				format!("Block {} not found", block_number),
				None,
				block_metadata(block_number),
			));
		}

		let block: Block = serde_json::from_value(block_data).map_err(|e| {
			BlockChainError::request_error(
				format!("{}: malformed block", msg),
				Some(Box::new(e)),
				block_metadata(block_number),
			)
		})?;

		if block.number() != Some(block_number) {
			return Err(BlockChainError::request_error(
				format!("{}: node returned block '{}'", msg, block.number),
				None,
				block_metadata(block_number),
			));
		}

		Ok(block)
	}
}
