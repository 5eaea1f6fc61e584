//! Parser configuration.
//!
//! Values are layered, later sources winning: built-in defaults, the optional JSON file,
//! then environment variables. Command line flags are copied into the environment by
//! the binary before loading, so they take precedence over everything.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, net::SocketAddr, path::Path, str::FromStr, time::Duration};
use url::Url;

use crate::{
	models::config::{ConfigError, ConfigLoader},
	utils::http::RetryConfig,
};

/// File read when `--config` is not given. Its absence is not an error.
pub const DEFAULT_CONFIG_PATH: &str = "config/parser.json";

/// Interval used when the configured one is zero.
pub const DEFAULT_POLLING_INTERVAL_SECS: u64 = 5;

fn default_rpc_url() -> String {
	"https://ethereum-rpc.publicnode.com".to_string()
}

fn default_polling_interval_secs() -> u64 {
	DEFAULT_POLLING_INTERVAL_SECS
}

fn default_lookback_blocks() -> u64 {
	5
}

fn default_api_address() -> String {
	"0.0.0.0:8080".to_string()
}

/// Runtime settings of the parser
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ParserConfig {
	/// JSON-RPC endpoint of the chain node
	#[serde(default = "default_rpc_url")]
	pub rpc_url: String,
	/// Seconds between polling ticks; 0 means the default
	#[serde(default = "default_polling_interval_secs")]
	pub polling_interval_secs: u64,
	/// Blocks behind head scanned on the first tick
	#[serde(default = "default_lookback_blocks")]
	pub lookback_blocks: u64,
	/// Listen address of the HTTP API
	#[serde(default = "default_api_address")]
	pub api_address: String,
	/// Retry policy for JSON-RPC requests
	#[serde(default)]
	pub http_retry: RetryConfig,
}

impl Default for ParserConfig {
	fn default() -> Self {
		Self {
			rpc_url: default_rpc_url(),
			polling_interval_secs: default_polling_interval_secs(),
			lookback_blocks: default_lookback_blocks(),
			api_address: default_api_address(),
			http_retry: RetryConfig::default(),
		}
	}
}

fn path_metadata(path: &Path) -> Option<HashMap<String, String>> {
	Some(HashMap::from([(
		"path".to_string(),
		path.display().to_string(),
	)]))
}

fn parse_u64_override(key: &str, value: &str) -> Result<u64, ConfigError> {
	value.trim().parse::<u64>().map_err(|e| {
		ConfigError::parse_error(
			format!("{} must be a non-negative integer, got '{}'", key, value),
			Some(Box::new(e)),
			None,
		)
	})
}

impl ParserConfig {
	/// Polling cadence with the zero value mapped to the default.
	pub fn effective_polling_interval(&self) -> Duration {
		match self.polling_interval_secs {
			0 => Duration::from_secs(DEFAULT_POLLING_INTERVAL_SECS),
			secs => Duration::from_secs(secs),
		}
	}

	/// Overrides fields from `RPC_URL`, `POLLING_INTERVAL_SECS`, `LOOKBACK_BLOCKS` and
	/// `API_ADDRESS`.
	///
	/// # Arguments
	/// * `lookup` - Variable lookup, `std::env::var` in production
	///
	/// # Returns
	/// * `Result<(), ConfigError>` - Parse error for non-numeric integer variables
	pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

		if let Some(url) = lookup("RPC_URL") {
			self.rpc_url = url.trim().to_string();
		}
		if let Some(value) = lookup("POLLING_INTERVAL_SECS") {
			self.polling_interval_secs = parse_u64_override("POLLING_INTERVAL_SECS", &value)?;
		}
		if let Some(value) = lookup("LOOKBACK_BLOCKS") {
			self.lookback_blocks = parse_u64_override("LOOKBACK_BLOCKS", &value)?;
		}
		if let Some(address) = lookup("API_ADDRESS") {
			self.api_address = address.trim().to_string();
		}
		Ok(())
	}

	/// Builds the effective configuration.
	///
	/// # Arguments
	/// * `path` - Explicit config file; must exist when given. When `None`,
	///   [`DEFAULT_CONFIG_PATH`] is read if present
	///
	/// # Returns
	/// * `Result<Self, ConfigError>` - The validated configuration
	pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
		let mut config = match path {
			Some(path) => Self::read_file(path)?,
			None => {
				let default_path = Path::new(DEFAULT_CONFIG_PATH);
				if default_path.exists() {
					Self::read_file(default_path)?
				} else {
					Self::default()
				}
			}
		};

		config.apply_env_overrides(|key| std::env::var(key).ok())?;
		config.validate()?;
		Ok(config)
	}

	fn read_file(path: &Path) -> Result<Self, ConfigError> {
		if !Self::is_json_file(path) {
			return Err(ConfigError::file_error(
				"config file must have a .json extension",
				None,
				path_metadata(path),
			));
		}

		let file = std::fs::File::open(path).map_err(|e| {
			ConfigError::file_error(
				format!("failed to open parser config file: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})?;

		serde_json::from_reader(file).map_err(|e| {
			ConfigError::parse_error(
				format!("failed to parse parser config: {}", e),
				Some(Box::new(e)),
				path_metadata(path),
			)
		})
	}
}

#[async_trait]
impl ConfigLoader for ParserConfig {
	/// Reads, then validates, a single JSON file without environment overrides.
	async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
		let config = Self::read_file(path)?;
		config.validate()?;
		Ok(config)
	}

	/// Ensures that:
	/// - `rpc_url` is an http or https URL
	/// - `lookback_blocks` is at least 1
	/// - `api_address` is a socket address
	fn validate(&self) -> Result<(), ConfigError> {
		let url = Url::parse(&self.rpc_url).map_err(|e| {
			ConfigError::validation_error(
				format!("Invalid rpc_url '{}': {}", self.rpc_url, e),
				Some(Box::new(e)),
				None,
			)
		})?;
		if !matches!(url.scheme(), "http" | "https") {
			return Err(ConfigError::validation_error(
				format!("rpc_url must use http or https, got '{}'", url.scheme()),
				None,
				None,
			));
		}

		if self.lookback_blocks == 0 {
			return Err(ConfigError::validation_error(
				"lookback_blocks must be at least 1",
				None,
				None,
			));
		}

		SocketAddr::from_str(&self.api_address).map_err(|e| {
			ConfigError::validation_error(
				format!("Invalid api_address '{}': {}", self.api_address, e),
				Some(Box::new(e)),
				None,
			)
		})?;

		self.validate_protocol();
		Ok(())
	}

	fn validate_protocol(&self) {
		if self.rpc_url.starts_with("http://") {
			tracing::warn!("Parser uses an insecure RPC URL: {}", self.rpc_url);
		}
	}
}
