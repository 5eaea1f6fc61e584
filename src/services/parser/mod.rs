//! Public operation surface: current block, subscribe, transaction lookup.

mod service;

pub use service::{Parser, ParserService};
