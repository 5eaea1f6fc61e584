//! Prometheus metrics.
//!
//! Counters are bumped by the polling engine as work happens. Gauges describing current
//! state are refreshed when the metrics endpoint is scraped.

pub mod server;

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};

lazy_static! {
	/// Registry gathered by the metrics endpoint.
	pub static ref REGISTRY: Registry = Registry::new();

	/// Ticks skipped because the head number could not be fetched.
	pub static ref HEAD_FETCH_FAILURES: IntCounter = {
		let counter = IntCounter::new(
			"parser_head_fetch_failures_total",
			"Polling ticks skipped because the chain head could not be fetched",
		)
		.unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	pub static ref BLOCKS_DISPATCHED: IntCounter = {
		let counter = IntCounter::new(
			"parser_blocks_dispatched_total",
			"Block extraction tasks started",
		)
		.unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// Blocks permanently skipped after a failed fetch.
	pub static ref BLOCK_FETCH_FAILURES: IntCounter = {
		let counter = IntCounter::new(
			"parser_block_fetch_failures_total",
			"Blocks skipped because they could not be fetched",
		)
		.unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	/// One increment per (address, transaction) pair committed.
	pub static ref TRANSACTIONS_MATCHED: IntCounter = {
		let counter = IntCounter::new(
			"parser_transactions_matched_total",
			"Transactions committed to the store, counted once per matching address",
		)
		.unwrap();
		REGISTRY.register(Box::new(counter.clone())).unwrap();
		counter
	};

	pub static ref SUBSCRIPTIONS: IntGauge = {
		let gauge = IntGauge::new("parser_subscriptions", "Number of subscribed addresses").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};

	pub static ref CURRENT_BLOCK: IntGauge = {
		let gauge =
			IntGauge::new("parser_current_block", "Last block dispatched for processing").unwrap();
		REGISTRY.register(Box::new(gauge.clone())).unwrap();
		gauge
	};
}

#[cfg(test)]
lazy_static! {
	/// Serializes tests that set the shared gauges.
	pub(crate) static ref TEST_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
}

/// Encodes every registered metric in the Prometheus text format.
pub fn gather_metrics() -> Result<Vec<u8>, Box<dyn std::error::Error>> {
	let encoder = TextEncoder::new();
	let metric_families = REGISTRY.gather();
	let mut buffer = Vec::new();
	encoder.encode(&metric_families, &mut buffer)?;
	Ok(buffer)
}

/// Refreshes the state gauges.
///
/// # Arguments
/// * `subscriptions` - Current size of the subscription registry
/// * `current_block` - Current chain cursor
pub fn update_parser_metrics(subscriptions: usize, current_block: u64) {
	SUBSCRIPTIONS.set(i64::try_from(subscriptions).unwrap_or(i64::MAX));
	CURRENT_BLOCK.set(i64::try_from(current_block).unwrap_or(i64::MAX));
}
