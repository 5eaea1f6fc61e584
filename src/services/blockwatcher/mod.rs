//! Polling engine.
//!
//! Periodically scans new blocks for transactions touching subscribed addresses and
//! commits them to the parser repository.

mod error;
mod service;

pub use error::BlockWatcherError;
pub use service::{
	extract_matches, process_block, process_new_blocks, BlockWatcherService, TickOutcome,
};
