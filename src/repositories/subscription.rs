//! Set of subscribed addresses.

use dashmap::DashSet;

use crate::models::Address;

/// Thread-safe, grow-only set of subscribed addresses.
///
/// Membership test and insert are a single sharded-lock operation, so concurrent
/// subscribers of the same address see exactly one successful insert.
#[derive(Debug, Default)]
pub struct SubscriptionRegistry {
	addresses: DashSet<Address>,
}

impl SubscriptionRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn contains(&self, address: &Address) -> bool {
		self.addresses.contains(address)
	}

	/// Inserts `address`, returning `false` without any change if it was already present.
	pub fn add(&self, address: Address) -> bool {
		self.addresses.insert(address)
	}

	pub fn count(&self) -> usize {
		self.addresses.len()
	}
}
