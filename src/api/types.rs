//! Request and response bodies.

use serde::{Deserialize, Serialize};

/// Envelope of every JSON response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiResponse<T> {
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub data: Option<T>,
}

impl<T> ApiResponse<T> {
	pub fn success(data: T) -> Self {
		Self {
			message: "success".to_string(),
			data: Some(data),
		}
	}
}

impl ApiResponse<()> {
	/// Response carrying only a message
	pub fn message(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			data: None,
		}
	}
}

/// Body of `POST /v1/subscribe`
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SubscribeRequest {
	#[serde(default)]
	pub address: Option<String>,
}
