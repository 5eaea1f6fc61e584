//! In-memory state of the parser.
//!
//! - `subscription`: set of subscribed addresses
//! - `transaction`: matched transactions per address
//! - `cursor`: last dispatched block
//! - `parser`: the three combined behind [`ParserRepositoryTrait`]

mod cursor;
mod parser;
mod subscription;
mod transaction;

pub use cursor::ChainCursor;
pub use parser::{InMemoryParserRepository, ParserRepositoryTrait};
pub use subscription::SubscriptionRegistry;
pub use transaction::TransactionStore;
