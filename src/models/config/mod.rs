//! Configuration loading and validation.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use std::path::Path;

mod error;
mod parser_config;

pub use error::ConfigError;
pub use parser_config::{ParserConfig, DEFAULT_CONFIG_PATH, DEFAULT_POLLING_INTERVAL_SECS};

/// Common interface for configuration read from JSON files
#[async_trait]
pub trait ConfigLoader: Sized {
	/// Load configuration from a specific file path
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError>;

	/// Returns Ok(()) if valid
	fn validate(&self) -> Result<(), ConfigError>;

	/// Logs a warning for plain-text transports. Never fails.
	fn validate_protocol(&self);

	fn is_json_file(path: &Path) -> bool {
		path.extension()
			.map(|ext| ext.to_string_lossy().to_lowercase() == "json")
			.unwrap_or(false)
	}
}
