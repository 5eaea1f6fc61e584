//! Matched transactions per subscribed address.

use dashmap::DashMap;

use crate::models::{Address, Transaction};

/// Append-only store of matched transactions keyed by address.
///
/// Each address has its own entry lock: appends to one address serialize, while reads
/// and writes of other addresses proceed in parallel.
#[derive(Debug, Default)]
pub struct TransactionStore {
	entries: DashMap<Address, Vec<Transaction>>,
}

impl TransactionStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a batch of matches, preserving batch order within each address.
	///
	/// The pairs of one address are appended under a single entry lock, so they land as
	/// one contiguous run even when other batches commit to the same address.
	///
	/// # Returns
	/// * `usize` - Number of pairs appended
	pub fn append_batch(&self, batch: Vec<(Address, Transaction)>) -> usize {
		let appended = batch.len();

		let mut groups: Vec<(Address, Vec<Transaction>)> = Vec::new();
		for (address, transaction) in batch {
			match groups.iter_mut().find(|(a, _)| *a == address) {
				Some((_, transactions)) => transactions.push(transaction),
				None => groups.push((address, vec![transaction])),
			}
		}

		for (address, transactions) in groups {
			self.entries.entry(address).or_default().extend(transactions);
		}
		appended
	}

	/// Snapshot of the transactions stored for `address`, empty when unknown.
	pub fn get(&self, address: &Address) -> Vec<Transaction> {
		self.entries
			.get(address)
			.map(|entry| entry.value().clone())
			.unwrap_or_default()
	}
}
