//! Last dispatched block number.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic block cursor. Zero means nothing has been processed yet.
#[derive(Debug, Default)]
pub struct ChainCursor {
	block: AtomicU64,
}

impl ChainCursor {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self) -> u64 {
		self.block.load(Ordering::Acquire)
	}

	/// Moves the cursor forward to `block`. A lower value leaves it unchanged.
	///
	/// # Returns
	/// * `u64` - The cursor value after the call
	pub fn advance_to(&self, block: u64) -> u64 {
		self.block.fetch_max(block, Ordering::AcqRel).max(block)
	}
}
