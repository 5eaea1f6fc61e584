//! Parser state repository.
//!
//! Groups the subscription registry, the transaction store and the chain cursor behind
//! one interface. Each part synchronizes internally, so the repository is shared as
//! `Arc<R>` without an outer lock.

use crate::{
	models::{Address, Transaction},
	repositories::{ChainCursor, SubscriptionRegistry, TransactionStore},
};

/// Interface for parser state storage
///
/// Implementations must be safe to call from the polling loop, from every block task
/// and from request handlers at the same time.
pub trait ParserRepositoryTrait: Send + Sync {
	fn is_subscribed(&self, address: &Address) -> bool;

	/// Returns `false` if the address was already subscribed
	fn subscribe(&self, address: Address) -> bool;

	fn subscription_count(&self) -> usize;

	/// Commits every match found in one block
	///
	/// Returns the number of pairs appended.
	fn commit_transactions(&self, batch: Vec<(Address, Transaction)>) -> usize;

	/// Returns an empty vector for addresses with no stored transactions
	fn get_transactions(&self, address: &Address) -> Vec<Transaction>;

	fn current_block(&self) -> u64;

	/// Moves the cursor forward; never backwards
	fn advance_current_block(&self, block: u64) -> u64;
}

/// Process-local repository. State is lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryParserRepository {
	subscriptions: SubscriptionRegistry,
	transactions: TransactionStore,
	cursor: ChainCursor,
}

impl InMemoryParserRepository {
	pub fn new() -> Self {
		Self::default()
	}
}

impl ParserRepositoryTrait for InMemoryParserRepository {
	fn is_subscribed(&self, address: &Address) -> bool {
		self.subscriptions.contains(address)
	}

	fn subscribe(&self, address: Address) -> bool {
		self.subscriptions.add(address)
	}

	fn subscription_count(&self) -> usize {
		self.subscriptions.count()
	}

	fn commit_transactions(&self, batch: Vec<(Address, Transaction)>) -> usize {
		self.transactions.append_batch(batch)
	}

	fn get_transactions(&self, address: &Address) -> Vec<Transaction> {
		self.transactions.get(address)
	}

	fn current_block(&self) -> u64 {
		self.cursor.get()
	}

	fn advance_current_block(&self, block: u64) -> u64 {
		self.cursor.advance_to(block)
	}
}
