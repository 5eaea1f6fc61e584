//! Query and subscription operations.
//!
//! These read and write the same repository as the polling engine, concurrently with
//! it. Invalid input is answered with `false` or an empty result, never an error.

use std::sync::Arc;

use crate::{
	models::{Address, Transaction},
	repositories::ParserRepositoryTrait,
};

/// Public operations of the parser
pub trait Parser: Send + Sync {
	/// Last block dispatched for processing; 0 before the first scan
	fn get_current_block(&self) -> u64;

	/// Adds `address` to the subscriptions
	///
	/// Returns `false` when the address is empty or already subscribed.
	fn subscribe(&self, address: &str) -> bool;

	/// Transactions recorded for `address`, oldest commit first
	///
	/// Unknown or empty addresses yield an empty vector.
	fn get_transactions(&self, address: &str) -> Vec<Transaction>;

	fn subscription_count(&self) -> usize;
}

/// [`Parser`] over a shared repository
pub struct ParserService<R: ParserRepositoryTrait> {
	repository: Arc<R>,
}

impl<R: ParserRepositoryTrait> ParserService<R> {
	pub fn new(repository: Arc<R>) -> Self {
		Self { repository }
	}

	pub fn repository(&self) -> Arc<R> {
		self.repository.clone()
	}
}

impl<R: ParserRepositoryTrait> Parser for ParserService<R> {
	fn get_current_block(&self) -> u64 {
		self.repository.current_block()
	}

	fn subscribe(&self, address: &str) -> bool {
		match Address::parse(address) {
			Ok(address) => {
				let added = self.repository.subscribe(address.clone());
				if added {
					tracing::info!(%address, "Subscribed address");
				}
				added
			}
			Err(_) => false,
		}
	}

	fn get_transactions(&self, address: &str) -> Vec<Transaction> {
		Address::parse(address)
			.map(|address| self.repository.get_transactions(&address))
			.unwrap_or_default()
	}

	fn subscription_count(&self) -> usize {
		self.repository.subscription_count()
	}
}
