use crate::properties::strategies::{address_strategy, transaction_strategy};

use proptest::{prelude::*, test_runner::Config};
use std::{collections::HashSet, sync::Arc};
use tx_parser::{
	models::Address,
	repositories::{InMemoryParserRepository, ParserRepositoryTrait},
	services::parser::{Parser, ParserService},
};

const MIN_TEST_CASES: usize = 1;
const MAX_TEST_CASES: usize = 20;

proptest! {
	#![proptest_config(Config {
		failure_persistence: None,
		..Config::default()
	})]

	// Only the first subscription of an address succeeds, whatever its casing.
	#[test]
	fn test_subscribe_idempotent(
		addresses in proptest::collection::vec(address_strategy(), MIN_TEST_CASES..MAX_TEST_CASES)
	) {
		let parser = ParserService::new(Arc::new(InMemoryParserRepository::new()));
		let mut seen = HashSet::new();

		for address in &addresses {
			let expected = seen.insert(address.to_lowercase());
			prop_assert_eq!(parser.subscribe(address), expected);
			prop_assert!(!parser.subscribe(&address.to_uppercase().replacen("0X", "0x", 1)));
		}

		prop_assert_eq!(parser.subscription_count(), seen.len());
	}

	// Batches for one address come back in commit order.
	#[test]
	fn test_commit_order_preserved(
		batches in proptest::collection::vec(
			proptest::collection::vec(transaction_strategy(), 0..5),
			MIN_TEST_CASES..10
		)
	) {
		let repository = InMemoryParserRepository::new();
		let address = Address::parse("0xabc").unwrap();

		for batch in &batches {
			repository.commit_transactions(
				batch.iter().cloned().map(|tx| (address.clone(), tx)).collect(),
			);
		}

		let expected: Vec<_> = batches.into_iter().flatten().collect();
		prop_assert_eq!(repository.get_transactions(&address), expected);
	}

	// The cursor never moves backwards.
	#[test]
	fn test_cursor_monotonic(
		values in proptest::collection::vec(0u64..1_000_000, MIN_TEST_CASES..MAX_TEST_CASES)
	) {
		let repository = InMemoryParserRepository::new();
		let mut max = 0;

		for value in values {
			repository.advance_current_block(value);
			max = max.max(value);
			prop_assert_eq!(repository.current_block(), max);
		}
	}
}
