//! Access to the chain node.
//!
//! - [`BlockSource`]: the interface the polling engine depends on
//! - [`EvmClient`]: JSON-RPC implementation of it
//! - transports and error types

mod client;
mod clients;
mod error;
mod transports;

pub use client::BlockSource;
pub use clients::EvmClient;
pub use error::BlockChainError;
pub use transports::{
	BlockchainTransport, EVMTransportClient, HttpTransportClient, TransientErrorRetryStrategy,
	TransportError, FAIL_FAST_STATUS_CODES,
};
