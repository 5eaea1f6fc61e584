//! Transaction parser entry point.
//!
//! Watches an Ethereum-compatible chain for transactions touching subscribed addresses
//! and serves them over HTTP.
//!
//! # Flow
//! 1. Applies CLI flags and `.env` to the environment, then sets up logging
//! 2. Loads and validates the configuration
//! 3. Starts the polling engine and the API server
//! 4. On Ctrl+C stops the server and the engine

use clap::Parser as ClapParser;
use dotenvy::dotenv_override;
use std::{
	env::{set_var, var},
	path::{Path, PathBuf},
	sync::Arc,
};
use tokio::sync::watch;
use tracing::{error, info};

use tx_parser::{
	api::create_api_server,
	bootstrap::{initialize_services, Result},
	models::ParserConfig,
	services::parser::Parser,
	utils::{logging::setup_logging, parse_string_to_bytes_size},
};

#[derive(ClapParser)]
#[command(
	name = "tx-parser",
	about = "Records Ethereum transactions sent to or from subscribed addresses and serves them over HTTP.",
	version
)]
struct Cli {
	/// Write logs to file instead of stdout
	#[arg(long)]
	log_file: bool,

	/// Set log level (trace, debug, info, warn, error)
	#[arg(long, value_name = "LEVEL")]
	log_level: Option<String>,

	/// Path to store log files (default: logs/)
	#[arg(long, value_name = "PATH")]
	log_path: Option<String>,

	/// Maximum log file size before rolling (e.g., "1GB", "500MB", "1024KB")
	#[arg(long, value_name = "SIZE", value_parser = parse_string_to_bytes_size)]
	log_max_size: Option<u64>,

	/// Path to the JSON configuration file (default: config/parser.json)
	#[arg(long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// JSON-RPC endpoint of the chain node
	#[arg(long, value_name = "URL")]
	rpc_url: Option<String>,

	/// Seconds between polling ticks
	#[arg(long, value_name = "SECONDS")]
	polling_interval_secs: Option<u64>,

	/// Blocks behind head scanned on the first tick
	#[arg(long, value_name = "BLOCKS")]
	lookback_blocks: Option<u64>,

	/// Address the API server listens on (default: 0.0.0.0:8080)
	#[arg(long, value_name = "HOST:PORT")]
	api_address: Option<String>,

	/// Validate configuration without starting the service
	#[arg(long)]
	check: bool,
}

impl Cli {
	/// Apply CLI options to environment variables, overriding any existing values
	fn apply_to_env(&self) {
		// Values from .env override the inherited environment
		dotenv_override().ok();

		if self.log_file {
			set_var("LOG_MODE", "file");
		}

		if let Ok(level) = var("RUST_LOG") {
			set_var("LOG_LEVEL", level);
		}

		if let Some(level) = &self.log_level {
			set_var("LOG_LEVEL", level);
			set_var("RUST_LOG", level);
		}

		if let Some(path) = &self.log_path {
			set_var("LOG_DATA_DIR", path);
		}

		if let Some(max_size) = &self.log_max_size {
			set_var("LOG_MAX_SIZE", max_size.to_string());
		}

		if let Some(url) = &self.rpc_url {
			set_var("RPC_URL", url);
		}

		if let Some(secs) = &self.polling_interval_secs {
			set_var("POLLING_INTERVAL_SECS", secs.to_string());
		}

		if let Some(blocks) = &self.lookback_blocks {
			set_var("LOOKBACK_BLOCKS", blocks.to_string());
		}

		if let Some(address) = &self.api_address {
			set_var("API_ADDRESS", address);
		}
	}
}

/// Loads and validates the configuration, logging the reason when it is rejected.
async fn load_config(path: Option<&Path>) -> Result<ParserConfig> {
	ParserConfig::load(path).await.map_err(|e| {
		error!("Invalid configuration: {}", e);
		e.into()
	})
}

#[tokio::main]
async fn main() -> Result<()> {
	let cli = Cli::parse();

	cli.apply_to_env();

	setup_logging().unwrap_or_else(|e| {
		eprintln!("Failed to setup logging: {}", e);
	});

	let config = load_config(cli.config.as_deref()).await?;

	if cli.check {
		info!(
			rpc_url = %config.rpc_url,
			polling_interval_secs = config.effective_polling_interval().as_secs(),
			lookback_blocks = config.lookback_blocks,
			api_address = %config.api_address,
			"Configuration is valid"
		);
		return Ok(());
	}

	let services = initialize_services(&config)
		.map_err(|e| anyhow::anyhow!("Failed to initialize services: {}", e))?;

	let parser: Arc<dyn Parser> = services.parser.clone();
	let server = create_api_server(&config.api_address, parser)?;
	let server_handle = server.handle();
	let mut server_task = tokio::spawn(server);

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let block_watcher = services.block_watcher;
	let watcher_task = tokio::spawn(async move { block_watcher.run(shutdown_rx).await });

	info!("Service started. Press Ctrl+C to shutdown");

	let server_stopped = tokio::select! {
		result = tokio::signal::ctrl_c() => {
			if let Err(e) = result {
				error!("Error waiting for Ctrl+C: {}", e);
			}
			info!("Shutdown signal received, stopping services...");
			false
		}
		result = &mut server_task => {
			match result {
				Ok(Err(e)) => error!("API server error: {}", e),
				Err(e) => error!("API server task failed: {}", e),
				Ok(Ok(())) => {}
			}
			info!("API server stopped, shutting down services...");
			true
		}
	};

	let _ = shutdown_tx.send(true);

	if !server_stopped {
		server_handle.stop(true).await;
		if let Err(e) = server_task.await {
			error!("API server task failed: {}", e);
		}
	}

	if let Err(e) = watcher_task.await {
		error!("Block watcher task failed: {}", e);
	}

	info!("Shutdown complete");
	Ok(())
}
