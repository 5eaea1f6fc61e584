use std::{sync::Arc, time::Duration};

use mockito::Server;
use serde_json::json;
use tempfile::TempDir;
use tokio::sync::watch;
use tx_parser::{
	bootstrap::initialize_services,
	models::{ConfigError, ParserConfig},
	services::{blockwatcher::TickOutcome, parser::Parser},
};

#[tokio::test]
async fn test_load_config_file_and_initialize() {
	let temp_dir = TempDir::new().unwrap();
	let path = temp_dir.path().join("parser.json");
	std::fs::write(
		&path,
		json!({
			"rpc_url": "http://localhost:8545",
			"polling_interval_secs": 3,
			"lookback_blocks": 10,
			"api_address": "127.0.0.1:9000"
		})
		.to_string(),
	)
	.unwrap();

	let config = ParserConfig::load(Some(path.as_path())).await.unwrap();
	assert_eq!(config.lookback_blocks, 10);

	let services = initialize_services(&config).unwrap();
	assert_eq!(services.block_watcher.polling_interval(), Duration::from_secs(3));
	assert_eq!(services.parser.get_current_block(), 0);
}

#[tokio::test]
async fn test_load_missing_explicit_file() {
	let temp_dir = TempDir::new().unwrap();
	let result = ParserConfig::load(Some(temp_dir.path().join("missing.json").as_path())).await;
	assert!(matches!(result, Err(ConfigError::FileError(_))));
}

#[tokio::test]
async fn test_services_against_mock_node() {
	let mut server = Server::new_async().await;
	let _head = server
		.mock("POST", "/")
		.match_body(mockito::Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
		.with_header("content-type", "application/json")
		.with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0xa"}"#)
		.create_async()
		.await;
	let _block = server
		.mock("POST", "/")
		.match_body(mockito::Matcher::PartialJson(json!({
			"method": "eth_getBlockByNumber",
			"params": ["0xa", true]
		})))
		.with_header("content-type", "application/json")
		.with_body(
			json!({
				"jsonrpc": "2.0",
				"id": 1,
				"result": {
					"number": "0xa",
					"hash": "0x01",
					"transactions": [{
						"hash": "0xfeed",
						"from": "0x00000000000000000000000000000000000000f1",
						"to": "0xABCDEF0000000000000000000000000000000001",
						"value": "0x1",
						"blockNumber": "0xa"
					}]
				}
			})
			.to_string(),
		)
		.create_async()
		.await;

	let config = ParserConfig {
		rpc_url: server.url(),
		lookback_blocks: 1,
		..Default::default()
	};
	let services = initialize_services(&config).unwrap();
	assert!(services
		.parser
		.subscribe("0xabcdef0000000000000000000000000000000001"));

	match services.block_watcher.tick().await.unwrap() {
		TickOutcome::Dispatched { from, to, tasks } => {
			assert_eq!((from, to), (10, 10));
			for task in tasks {
				task.await.unwrap();
			}
		}
		other => panic!("expected dispatched blocks, got {:?}", other),
	}

	assert_eq!(services.parser.get_current_block(), 10);
	let transactions = services
		.parser
		.get_transactions("0xABCDEF0000000000000000000000000000000001");
	assert_eq!(transactions.len(), 1);
	assert_eq!(transactions[0].hash, "0xfeed");
}

#[tokio::test]
async fn test_polling_loop_shutdown() {
	let config = ParserConfig {
		rpc_url: "http://127.0.0.1:1".to_string(),
		polling_interval_secs: 1,
		..Default::default()
	};
	let services = initialize_services(&config).unwrap();
	let parser: Arc<dyn Parser> = services.parser.clone();

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let block_watcher = services.block_watcher;
	let handle = tokio::spawn(async move { block_watcher.run(shutdown_rx).await });

	tokio::time::sleep(Duration::from_millis(50)).await;
	shutdown_tx.send(true).unwrap();

	tokio::time::timeout(Duration::from_secs(2), handle)
		.await
		.expect("polling loop did not stop")
		.unwrap();
	assert_eq!(parser.get_current_block(), 0);
}
