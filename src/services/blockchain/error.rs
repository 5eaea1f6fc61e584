//! Errors returned by the block source.
//!
//! Every variant is transient from the polling engine's point of view: a failed head
//! fetch skips the tick, a failed block fetch skips that block.

use crate::{
	services::blockchain::transports::TransportError,
	utils::logging::error::{BoxedSource, ErrorContext, TraceableError},
};
use std::collections::HashMap;
use thiserror::Error as ThisError;
use uuid::Uuid;

#[derive(ThisError, Debug)]
pub enum BlockChainError {
	/// The node could not be reached
	#[error("Connection error: {0}")]
	ConnectionError(ErrorContext),

	/// Malformed request or response
	#[error("Request error: {0}")]
	RequestError(ErrorContext),

	/// The node answered 429
	#[error("Rate limited: {0}")]
	RateLimited(ErrorContext),

	/// `eth_getBlockByNumber` returned `null`
	#[error("Block not found: {0}")]
	BlockNotFound(ErrorContext),

	#[error(transparent)]
	Other(#[from] anyhow::Error),
}

impl BlockChainError {
	pub fn connection_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::ConnectionError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn request_error(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RequestError(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn rate_limited(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::RateLimited(ErrorContext::new_with_log(msg, source, metadata))
	}

	pub fn block_not_found(
		msg: impl Into<String>,
		source: Option<BoxedSource>,
		metadata: Option<HashMap<String, String>>,
	) -> Self {
		Self::BlockNotFound(ErrorContext::new_with_log(msg, source, metadata))
	}

	/// Classifies a transport failure.
	///
	/// # Arguments
	/// * `msg` - What the caller was doing, e.g. `"Failed to get block 97"`
	/// * `error` - The transport failure, kept as the source
	pub fn from_transport(msg: impl Into<String>, error: TransportError) -> Self {
		match &error {
			_ if error.is_rate_limited() => Self::rate_limited(msg, Some(Box::new(error)), None),
			TransportError::Network(_) => Self::connection_error(msg, Some(Box::new(error)), None),
			_ => Self::request_error(msg, Some(Box::new(error)), None),
		}
	}
}

impl TraceableError for BlockChainError {
	fn trace_id(&self) -> String {
		match self {
			Self::ConnectionError(ctx)
			| Self::RequestError(ctx)
			| Self::RateLimited(ctx)
			| Self::BlockNotFound(ctx) => ctx.trace_id.clone(),
			Self::Other(_) => Uuid::new_v4().to_string(),
		}
	}
}
