//! Polling engine.
//!
//! Every tick reads the subscription count and the cursor, fetches the chain head,
//! spawns one extraction task per unprocessed block and moves the cursor to the head
//! without waiting for those tasks. Failed fetches are logged and skipped; the loop
//! itself only stops on shutdown.

use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{
	sync::watch,
	task::JoinHandle,
	time::{interval, MissedTickBehavior},
};
use tracing::instrument;

use crate::{
	models::{Address, Block, ParserConfig, Transaction},
	repositories::ParserRepositoryTrait,
	services::{blockchain::BlockSource, blockwatcher::error::BlockWatcherError},
	utils::metrics::{
		BLOCKS_DISPATCHED, BLOCK_FETCH_FAILURES, HEAD_FETCH_FAILURES, TRANSACTIONS_MATCHED,
	},
};

/// What a single tick did
#[derive(Debug)]
pub enum TickOutcome {
	/// No subscriptions, nothing fetched
	Idle,
	/// Head is not past the cursor
	UpToDate,
	/// Blocks `from..=to` were handed to extraction tasks
	Dispatched {
		from: u64,
		to: u64,
		/// Handles of the per-block tasks. The polling loop drops them.
		tasks: Vec<JoinHandle<()>>,
	},
}

/// Background service that keeps the repository in sync with the chain
pub struct BlockWatcherService<C, R> {
	pub block_source: Arc<C>,
	pub repository: Arc<R>,
	polling_interval: Duration,
	lookback_blocks: u64,
}

impl<C, R> BlockWatcherService<C, R>
where
	C: BlockSource + 'static,
	R: ParserRepositoryTrait + 'static,
{
	/// Creates a new polling engine
	///
	/// # Arguments
	/// * `block_source` - Chain access
	/// * `repository` - Shared parser state
	/// * `polling_interval` - Time between tick starts; must be non-zero
	/// * `lookback_blocks` - Blocks behind head scanned when the cursor is unset
	///
	/// # Returns
	/// * `Result<Self, BlockWatcherError>` - Scheduler error for a zero interval
	pub fn new(
		block_source: Arc<C>,
		repository: Arc<R>,
		polling_interval: Duration,
		lookback_blocks: u64,
	) -> Result<Self, BlockWatcherError> {
		if polling_interval.is_zero() {
			return Err(BlockWatcherError::scheduler_error(
				"Polling interval must be greater than zero",
				None,
				None,
			));
		}

		Ok(Self {
			block_source,
			repository,
			polling_interval,
			lookback_blocks,
		})
	}

	/// Creates an engine using the interval and lookback from `config`
	pub fn from_config(
		block_source: Arc<C>,
		repository: Arc<R>,
		config: &ParserConfig,
	) -> Result<Self, BlockWatcherError> {
		Self::new(
			block_source,
			repository,
			config.effective_polling_interval(),
			config.lookback_blocks,
		)
	}

	pub fn polling_interval(&self) -> Duration {
		self.polling_interval
	}

	/// Runs a single tick
	pub async fn tick(&self) -> Result<TickOutcome, BlockWatcherError> {
		process_new_blocks(&self.block_source, &self.repository, self.lookback_blocks).await
	}

	/// Polls until `shutdown_rx` turns `true` or its sender is dropped.
	///
	/// The first tick runs immediately. A tick that overruns the interval delays the
	/// next one instead of triggering a burst. Extraction tasks still running at
	/// shutdown are left to finish on their own.
	pub async fn run(&self, mut shutdown_rx: watch::Receiver<bool>) {
		let mut ticker = interval(self.polling_interval);
		ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

		tracing::info!(
			interval_secs = self.polling_interval.as_secs_f64(),
			lookback_blocks = self.lookback_blocks,
			"Started block watcher"
		);

		loop {
			if *shutdown_rx.borrow() {
				break;
			}

			tokio::select! {
				biased;
				changed = shutdown_rx.changed() => {
					if changed.is_err() {
						break;
					}
					continue;
				}
				_ = ticker.tick() => {}
			}

			match self.tick().await {
				Ok(TickOutcome::Idle) => tracing::debug!("No subscriptions, tick skipped"),
				Ok(TickOutcome::UpToDate) => tracing::debug!("No new blocks"),
				Ok(TickOutcome::Dispatched { .. }) => {}
				Err(e) => tracing::debug!(error = %e, "Tick skipped"),
			}
		}

		tracing::info!("Stopped block watcher");
	}
}

/// Runs one polling step.
///
/// # Arguments
/// * `block_source` - Chain access
/// * `repository` - Shared parser state
/// * `lookback_blocks` - Blocks behind head scanned when the cursor is unset
///
/// # Returns
/// * `Result<TickOutcome, BlockWatcherError>` - [`BlockWatcherError::HeadUnavailable`]
///   when the head could not be fetched; the cursor is then left untouched
#[instrument(skip_all)]
pub async fn process_new_blocks<C, R>(
	block_source: &Arc<C>,
	repository: &Arc<R>,
	lookback_blocks: u64,
) -> Result<TickOutcome, BlockWatcherError>
where
	C: BlockSource + 'static,
	R: ParserRepositoryTrait + 'static,
{
	if repository.subscription_count() == 0 {
		return Ok(TickOutcome::Idle);
	}

	let head = block_source.get_latest_block_number().await.map_err(|e| {
		HEAD_FETCH_FAILURES.inc();
		BlockWatcherError::head_unavailable(
			"Failed to fetch chain head, skipping tick",
			Some(Box::new(e)),
			None,
		)
	})?;

	let cursor = repository.current_block();
	let start = match cursor {
		0 => head.saturating_sub(lookback_blocks),
		_ => cursor,
	};

	if head <= start {
		return Ok(TickOutcome::UpToDate);
	}

	let tasks: Vec<JoinHandle<()>> = (start + 1..=head)
		.map(|block_number| {
			let block_source = block_source.clone();
			let repository = repository.clone();
			tokio::spawn(async move {
				// Failures are logged where the error is built.
				let _ = process_block(block_source, repository, block_number).await;
			})
		})
		.collect();
	BLOCKS_DISPATCHED.inc_by(head - start);

	repository.advance_current_block(head);

	tracing::info!(
		from = start + 1,
		to = head,
		previous_cursor = cursor,
		"Dispatched {} blocks",
		head - start
	);

	Ok(TickOutcome::Dispatched {
		from: start + 1,
		to: head,
		tasks,
	})
}

/// Fetches one block and commits its matches.
///
/// # Returns
/// * `Result<usize, BlockWatcherError>` - Number of (address, transaction) pairs
///   committed, or a processing error when the block could not be fetched
#[instrument(skip(block_source, repository))]
pub async fn process_block<C, R>(
	block_source: Arc<C>,
	repository: Arc<R>,
	block_number: u64,
) -> Result<usize, BlockWatcherError>
where
	C: BlockSource + ?Sized,
	R: ParserRepositoryTrait + ?Sized,
{
	let block = block_source.get_block(block_number).await.map_err(|e| {
		BLOCK_FETCH_FAILURES.inc();
		BlockWatcherError::processing_error(
			"Skipping block",
			Some(Box::new(e)),
			Some(HashMap::from([(
				"block".to_string(),
				block_number.to_string(),
			)])),
		)
	})?;

	let matches = extract_matches(&block, |address| repository.is_subscribed(address));
	if matches.is_empty() {
		return Ok(0);
	}

	let committed = repository.commit_transactions(matches);
	TRANSACTIONS_MATCHED.inc_by(committed as u64);
	tracing::debug!(block_number, committed, "Committed matched transactions");

	Ok(committed)
}

/// Pairs each transaction in `block` with the subscribed addresses it touches.
///
/// The sender is checked first, then the recipient unless it equals the sender, so a
/// self-transfer is recorded once. Unparseable or missing addresses never match.
pub fn extract_matches<F>(block: &Block, is_subscribed: F) -> Vec<(Address, Transaction)>
where
	F: Fn(&Address) -> bool,
{
	let mut matches = Vec::new();

	for transaction in &block.transactions {
		let from = Address::parse(&transaction.from).ok();
		let to = transaction
			.to
			.as_deref()
			.and_then(|to| Address::parse(to).ok());

		if let Some(from) = from.as_ref().filter(|a| is_subscribed(*a)) {
			matches.push((from.clone(), transaction.clone()));
		}
		if let Some(to) = to.filter(|a| is_subscribed(a) && Some(a) != from.as_ref()) {
			matches.push((to, transaction.clone()));
		}
	}

	matches
}
