//! Chain data as delivered by the JSON-RPC node.

mod block;
mod transaction;

pub use block::Block;
pub use transaction::Transaction;
