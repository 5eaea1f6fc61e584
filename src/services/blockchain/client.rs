//! Block source interface.
//!
//! The polling engine reaches the chain only through [`BlockSource`], which keeps it
//! independent of the wire protocol and lets tests substitute a mock.

use async_trait::async_trait;

use crate::{models::Block, services::blockchain::BlockChainError};

/// Read access to the chain
#[async_trait]
pub trait BlockSource: Send + Sync {
	/// Retrieves the current head block number
	///
	/// # Returns
	/// * `Result<u64, BlockChainError>` - The head number, or a transient failure
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError>;

	/// Retrieves one block with its full transaction objects
	///
	/// # Arguments
	/// * `block_number` - Number of the block to fetch
	///
	/// # Returns
	/// * `Result<Block, BlockChainError>` - [`BlockChainError::BlockNotFound`] when the node
	///   has no such block yet
	async fn get_block(&self, block_number: u64) -> Result<Block, BlockChainError>;
}
