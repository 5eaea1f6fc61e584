//! Normalized account address.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::utils::parsing::normalize_string;

/// Rejected address input. Returned to the caller, never logged as a system failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
	#[error("address is empty")]
	Empty,
}

/// Address in canonical form: trimmed and lowercased.
///
/// Every value of this type is already normalized, so two addresses that differ only in
/// case or surrounding whitespace compare equal and hash to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
	/// Normalizes `input` into an address.
	///
	/// # Arguments
	/// * `input` - Raw address as supplied by a caller or a block
	///
	/// # Returns
	/// * `Result<Address, AddressError>` - [`AddressError::Empty`] for empty or
	///   whitespace-only input
	pub fn parse(input: &str) -> Result<Self, AddressError> {
		let normalized = normalize_string(input);
		if normalized.is_empty() {
			return Err(AddressError::Empty);
		}
		Ok(Self(normalized))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Address {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for Address {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

impl std::str::FromStr for Address {
	type Err = AddressError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}

impl<'de> Deserialize<'de> for Address {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;
		Self::parse(&raw).map_err(serde::de::Error::custom)
	}
}
