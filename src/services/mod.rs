//! Core services.
//!
//! - `blockchain`: chain access through the block source
//! - `blockwatcher`: the polling engine
//! - `parser`: subscription and query operations

pub mod blockchain;
pub mod blockwatcher;
pub mod parser;
