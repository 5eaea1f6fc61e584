//! Block with its full transaction list.

use serde::{Deserialize, Serialize};

use super::Transaction;
use crate::utils::parse_hex_quantity;

/// Transient block as returned by the node. Never stored.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Block {
	/// Hex encoded block number
	pub number: String,
	pub hash: String,
	#[serde(default)]
	pub transactions: Vec<Transaction>,
}

impl Block {
	/// Block number decoded from its hex form, `None` when malformed.
	pub fn number(&self) -> Option<u64> {
		parse_hex_quantity(&self.number).ok()
	}
}
