//! Subscribed-address transaction parser.
//!
//! Polls an Ethereum-compatible JSON-RPC node, keeps every transaction sent to or from a
//! subscribed address in memory, and answers queries about them.
//!
//! # Module Structure
//!
//! - `api`: HTTP query surface
//! - `bootstrap`: Wires the services together
//! - `models`: Addresses, chain data and configuration
//! - `repositories`: In-memory subscriptions, transactions and chain cursor
//! - `services`: Block source, polling engine and public operations
//! - `utils`: Logging, errors, HTTP retry, metrics and test helpers

pub mod api;
pub mod bootstrap;
pub mod models;
pub mod repositories;
pub mod services;
pub mod utils;
