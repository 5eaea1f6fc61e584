use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::{watch, Semaphore};
use tx_parser::{
	models::{Address, Block, Transaction},
	repositories::{InMemoryParserRepository, ParserRepositoryTrait},
	services::{
		blockchain::{BlockChainError, BlockSource},
		blockwatcher::{
			process_block, process_new_blocks, BlockWatcherError, BlockWatcherService, TickOutcome,
		},
	},
	utils::tests::builders::{block::BlockBuilder, transaction::TransactionBuilder},
};

use crate::integration::mocks::MockBlockSource;

const X: &str = "0xaaaa000000000000000000000000000000000001";
const Y: &str = "0xbbbb000000000000000000000000000000000002";
const Z: &str = "0xcccc000000000000000000000000000000000003";

fn address(value: &str) -> Address {
	Address::parse(value).unwrap()
}

fn repository_with(subscriptions: &[&str]) -> Arc<InMemoryParserRepository> {
	let repository = Arc::new(InMemoryParserRepository::new());
	for subscription in subscriptions {
		repository.subscribe(address(subscription));
	}
	repository
}

async fn join_all(outcome: TickOutcome) -> (u64, u64) {
	match outcome {
		TickOutcome::Dispatched { from, to, tasks } => {
			for task in tasks {
				task.await.unwrap();
			}
			(from, to)
		}
		other => panic!("expected dispatched blocks, got {:?}", other),
	}
}

fn transfer(hash: &str, from: &str, to: &str, block: u64) -> Transaction {
	TransactionBuilder::new()
		.hash(hash)
		.from(from)
		.to(to)
		.block_number(block)
		.build()
}

#[tokio::test]
async fn test_first_tick_scans_lookback_window() {
	let repository = repository_with(&[X]);
	let tx = transfer("0x97", "0xAAAA000000000000000000000000000000000001", Z, 97);

	let mut block_source = MockBlockSource::new();
	block_source
		.expect_get_latest_block_number()
		.times(1)
		.returning(|| Ok(100));

	let block_tx = tx.clone();
	block_source
		.expect_get_block()
		.times(5)
		.returning(move |number| {
			assert!((96..=100).contains(&number), "unexpected block {}", number);
			let mut builder = BlockBuilder::new().number(number);
			if number == 97 {
				builder = builder.add_transaction(block_tx.clone());
			}
			Ok(builder.build())
		});

	let block_source = Arc::new(block_source);
	let outcome = process_new_blocks(&block_source, &repository, 5)
		.await
		.unwrap();

	assert_eq!(join_all(outcome).await, (96, 100));
	assert_eq!(repository.current_block(), 100);
	assert_eq!(repository.get_transactions(&address(X)), vec![tx]);
	assert!(repository.get_transactions(&address(Z)).is_empty());
}

#[tokio::test]
async fn test_failed_block_is_skipped() {
	let repository = repository_with(&[X]);

	let mut block_source = MockBlockSource::new();
	block_source
		.expect_get_latest_block_number()
		.returning(|| Ok(100));
	block_source.expect_get_block().returning(|number| {
		if number == 97 {
			return Err(BlockChainError::connection_error("connection reset", None, None));
		}
		Ok(BlockBuilder::new()
			.number(number)
			.add_transaction(transfer(&format!("0x{:x}", number), X, Y, number))
			.build())
	});

	let block_source = Arc::new(block_source);
	let outcome = process_new_blocks(&block_source, &repository, 5)
		.await
		.unwrap();
	join_all(outcome).await;

	// Block 97 is gone for good; the cursor still moved past it.
	assert_eq!(repository.current_block(), 100);
	let mut blocks: Vec<String> = repository
		.get_transactions(&address(X))
		.into_iter()
		.map(|tx| tx.block_number)
		.collect();
	blocks.sort();
	assert_eq!(blocks, vec!["0x60", "0x62", "0x63", "0x64"]);
}

#[tokio::test]
async fn test_process_block_error_carries_block_number() {
	let repository = repository_with(&[X]);

	let mut block_source = MockBlockSource::new();
	block_source
		.expect_get_block()
		.returning(|_| Err(BlockChainError::block_not_found("Block 97 not found", None, None)));

	let result = process_block(Arc::new(block_source), repository.clone(), 97).await;
	match result {
		Err(BlockWatcherError::ProcessingError(ctx)) => {
			assert_eq!(
				ctx.metadata.as_ref().and_then(|m| m.get("block")).cloned(),
				Some("97".to_string())
			);
		}
		other => panic!("expected processing error, got {:?}", other),
	}
	assert_eq!(repository.current_block(), 0);
}

#[tokio::test]
async fn test_self_transfer_recorded_once() {
	let repository = repository_with(&[X]);
	let tx = transfer("0x1", X, X, 50);

	let mut block_source = MockBlockSource::new();
	let block = BlockBuilder::new().number(50).add_transaction(tx.clone()).build();
	block_source
		.expect_get_block()
		.times(1)
		.returning(move |_| Ok(block.clone()));

	let committed = process_block(Arc::new(block_source), repository.clone(), 50)
		.await
		.unwrap();

	assert_eq!(committed, 1);
	assert_eq!(repository.get_transactions(&address(X)), vec![tx]);
}

#[tokio::test]
async fn test_transfer_between_subscribed_addresses() {
	let repository = repository_with(&[X, Y]);
	let tx = transfer("0x1", X, Y, 50);

	let mut block_source = MockBlockSource::new();
	let block = BlockBuilder::new().number(50).add_transaction(tx.clone()).build();
	block_source
		.expect_get_block()
		.returning(move |_| Ok(block.clone()));

	let committed = process_block(Arc::new(block_source), repository.clone(), 50)
		.await
		.unwrap();

	assert_eq!(committed, 2);
	assert_eq!(repository.get_transactions(&address(X)), vec![tx.clone()]);
	assert_eq!(repository.get_transactions(&address(Y)), vec![tx]);
}

#[tokio::test]
async fn test_block_without_matches_commits_nothing() {
	let repository = repository_with(&[X]);

	let mut block_source = MockBlockSource::new();
	block_source.expect_get_block().returning(|number| {
		Ok(BlockBuilder::new()
			.number(number)
			.add_transaction(transfer("0x1", Y, Z, number))
			.add_transaction(TransactionBuilder::new().from(Z).contract_creation().build())
			.build())
	});

	let committed = process_block(Arc::new(block_source), repository.clone(), 7)
		.await
		.unwrap();

	assert_eq!(committed, 0);
	assert!(repository.get_transactions(&address(X)).is_empty());
}

#[tokio::test]
async fn test_no_subscriptions_is_idle() {
	let repository = repository_with(&[]);

	let mut block_source = MockBlockSource::new();
	block_source.expect_get_latest_block_number().never();
	block_source.expect_get_block().never();

	let outcome = process_new_blocks(&Arc::new(block_source), &repository, 5)
		.await
		.unwrap();

	assert!(matches!(outcome, TickOutcome::Idle));
	assert_eq!(repository.current_block(), 0);
}

#[tokio::test]
async fn test_head_failure_leaves_cursor() {
	let repository = repository_with(&[X]);
	repository.advance_current_block(42);

	let mut block_source = MockBlockSource::new();
	block_source
		.expect_get_latest_block_number()
		.times(1)
		.returning(|| Err(BlockChainError::rate_limited("Too many requests", None, None)));
	block_source.expect_get_block().never();

	let result = process_new_blocks(&Arc::new(block_source), &repository, 5).await;

	assert!(matches!(result, Err(BlockWatcherError::HeadUnavailable(_))));
	assert_eq!(repository.current_block(), 42);
}

#[tokio::test]
async fn test_second_tick_is_incremental() {
	let repository = repository_with(&[X]);
	repository.advance_current_block(100);

	let mut block_source = MockBlockSource::new();
	block_source
		.expect_get_latest_block_number()
		.returning(|| Ok(102));
	block_source.expect_get_block().times(2).returning(|number| {
		assert!(number == 101 || number == 102, "unexpected block {}", number);
		Ok(BlockBuilder::new().number(number).build())
	});

	let outcome = process_new_blocks(&Arc::new(block_source), &repository, 5)
		.await
		.unwrap();

	assert_eq!(join_all(outcome).await, (101, 102));
	assert_eq!(repository.current_block(), 102);
}

#[tokio::test]
async fn test_head_not_past_cursor_is_up_to_date() {
	let repository = repository_with(&[X]);
	repository.advance_current_block(100);

	let mut block_source = MockBlockSource::new();
	block_source
		.expect_get_latest_block_number()
		.returning(|| Ok(100));
	block_source.expect_get_block().never();

	let outcome = process_new_blocks(&Arc::new(block_source), &repository, 5)
		.await
		.unwrap();

	assert!(matches!(outcome, TickOutcome::UpToDate));
	assert_eq!(repository.current_block(), 100);
}

#[tokio::test]
async fn test_head_below_lookback_scans_from_genesis() {
	let repository = repository_with(&[X]);

	let mut block_source = MockBlockSource::new();
	block_source
		.expect_get_latest_block_number()
		.returning(|| Ok(3));
	block_source
		.expect_get_block()
		.times(3)
		.returning(|number| Ok(BlockBuilder::new().number(number).build()));

	let outcome = process_new_blocks(&Arc::new(block_source), &repository, 5)
		.await
		.unwrap();

	assert_eq!(join_all(outcome).await, (1, 3));
	assert_eq!(repository.current_block(), 3);
}

#[test]
fn test_zero_interval_rejected() {
	let result = BlockWatcherService::new(
		Arc::new(MockBlockSource::new()),
		repository_with(&[]),
		Duration::ZERO,
		5,
	);

	assert!(matches!(result, Err(BlockWatcherError::SchedulerError(_))));
}

#[tokio::test]
async fn test_run_polls_until_shutdown() {
	let repository = repository_with(&[X]);
	let tx = transfer("0x1", Y, X, 10);

	let mut block_source = MockBlockSource::new();
	block_source
		.expect_get_latest_block_number()
		.returning(|| Ok(10));
	let block = BlockBuilder::new().number(10).add_transaction(tx.clone()).build();
	block_source
		.expect_get_block()
		.returning(move |number| {
			assert_eq!(number, 10);
			Ok(block.clone())
		});

	let service = BlockWatcherService::new(
		Arc::new(block_source),
		repository.clone(),
		Duration::from_millis(20),
		1,
	)
	.unwrap();

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let handle = tokio::spawn(async move { service.run(shutdown_rx).await });

	let mut recorded = Vec::new();
	for _ in 0..100 {
		recorded = repository.get_transactions(&address(X));
		if !recorded.is_empty() {
			break;
		}
		tokio::time::sleep(Duration::from_millis(10)).await;
	}
	assert_eq!(recorded, vec![tx]);
	assert_eq!(repository.current_block(), 10);

	shutdown_tx.send(true).unwrap();
	tokio::time::timeout(Duration::from_secs(1), handle)
		.await
		.expect("polling loop did not stop")
		.unwrap();
}

#[tokio::test]
async fn test_run_stops_when_sender_dropped() {
	let mut block_source = MockBlockSource::new();
	block_source.expect_get_latest_block_number().never();

	let service = BlockWatcherService::new(
		Arc::new(block_source),
		repository_with(&[]),
		Duration::from_millis(10),
		5,
	)
	.unwrap();

	let (shutdown_tx, shutdown_rx) = watch::channel(false);
	let handle = tokio::spawn(async move { service.run(shutdown_rx).await });
	drop(shutdown_tx);

	tokio::time::timeout(Duration::from_secs(1), handle)
		.await
		.expect("polling loop did not stop")
		.unwrap();
}

/// Block source whose block fetches wait until the test hands out permits.
struct GatedBlockSource {
	head: u64,
	gate: Arc<Semaphore>,
	transaction: Transaction,
}

#[async_trait]
impl BlockSource for GatedBlockSource {
	async fn get_latest_block_number(&self) -> Result<u64, BlockChainError> {
		Ok(self.head)
	}

	async fn get_block(&self, block_number: u64) -> Result<Block, BlockChainError> {
		let _permit = self.gate.acquire().await.unwrap();
		Ok(BlockBuilder::new()
			.number(block_number)
			.add_transaction(self.transaction.clone())
			.build())
	}
}

#[tokio::test]
async fn test_cursor_advances_before_blocks_are_processed() {
	let repository = repository_with(&[X]);
	let gate = Arc::new(Semaphore::new(0));
	let block_source = Arc::new(GatedBlockSource {
		head: 100,
		gate: gate.clone(),
		transaction: transfer("0x1", Y, X, 100),
	});

	let outcome = process_new_blocks(&block_source, &repository, 3)
		.await
		.unwrap();

	// Tasks are dispatched but none can fetch its block yet.
	assert_eq!(repository.current_block(), 100);
	assert!(repository.get_transactions(&address(X)).is_empty());

	gate.add_permits(3);
	assert_eq!(join_all(outcome).await, (98, 100));
	assert_eq!(repository.get_transactions(&address(X)).len(), 3);
}
