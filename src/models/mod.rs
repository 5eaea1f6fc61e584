//! Domain models and data structures.
//!
//! - `blockchain`: blocks and transactions as delivered by the node
//! - `config`: configuration loading and validation
//! - `core`: normalized addresses

mod blockchain;
mod config;
mod core;

pub use blockchain::{Block, Transaction};

pub use core::{Address, AddressError};

pub use config::{
	ConfigError, ConfigLoader, ParserConfig, DEFAULT_CONFIG_PATH, DEFAULT_POLLING_INTERVAL_SECS,
};
