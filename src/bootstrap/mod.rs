//! Service wiring.
//!
//! Builds the block source, the shared repository and the two services reading and
//! writing it: the polling engine and the public operations.

use std::{error::Error, sync::Arc};

use crate::{
	models::ParserConfig,
	repositories::InMemoryParserRepository,
	services::{
		blockchain::{EVMTransportClient, EvmClient},
		blockwatcher::BlockWatcherService,
		parser::ParserService,
	},
};

/// Type alias for handling ServiceResult
pub type Result<T> = std::result::Result<T, Box<dyn Error>>;

/// Polling engine over the JSON-RPC block source
pub type ParserBlockWatcher =
	BlockWatcherService<EvmClient<EVMTransportClient>, InMemoryParserRepository>;

/// Services sharing one repository
pub struct ParserServices {
	pub block_watcher: ParserBlockWatcher,
	pub parser: Arc<ParserService<InMemoryParserRepository>>,
	pub repository: Arc<InMemoryParserRepository>,
}

/// Initializes all services from a validated configuration.
///
/// No request is sent to the node here.
///
/// # Errors
/// Returns an error if the transport cannot be built or the polling interval is invalid
pub fn initialize_services(config: &ParserConfig) -> Result<ParserServices> {
	let block_source = Arc::new(EvmClient::new(config)?);
	let repository = Arc::new(InMemoryParserRepository::new());

	let block_watcher =
		BlockWatcherService::from_config(block_source, repository.clone(), config)?;
	let parser = Arc::new(ParserService::new(repository.clone()));

	Ok(ParserServices {
		block_watcher,
		parser,
		repository,
	})
}
