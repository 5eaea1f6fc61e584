//! Block source implementations.
//!
//! - EVM client for Ethereum-compatible JSON-RPC nodes

mod evm {
	pub mod client;
}

pub use evm::client::EvmClient;
