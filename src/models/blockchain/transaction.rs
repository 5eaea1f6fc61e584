//! Transaction as returned inside `eth_getBlockByNumber` with full transaction objects.

use serde::{Deserialize, Serialize};

/// Immutable transaction record.
///
/// Only the fields needed for matching and for query responses are kept; the node's
/// other fields are ignored on decode. Values are stored exactly as the node sent them
/// (hex strings), so a stored transaction serializes back to the same shape.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transaction {
	pub hash: String,
	pub from: String,
	/// `None` for contract creations
	pub to: Option<String>,
	pub value: String,
	#[serde(rename = "blockNumber")]
	pub block_number: String,
}
