//! Core domain models.

mod address;

pub use address::{Address, AddressError};
