//! String parsing helpers.

use byte_unit::Byte;
use std::str::FromStr;

/// Parses a human readable size such as `500MB` or `1GiB` into bytes.
pub fn parse_string_to_bytes_size(s: &str) -> Result<u64, String> {
	Byte::from_str(s)
		.map(|byte| byte.as_u64())
		.map_err(|e| format!("Invalid size format: '{}'. Error: {}", s, e))
}

/// Decodes a `0x`-prefixed hex quantity such as a block number.
///
/// Exactly one prefix is accepted and the digits must be plain hex.
pub fn parse_hex_quantity(s: &str) -> Result<u64, String> {
	let digits = s
		.strip_prefix("0x")
		.ok_or_else(|| format!("missing 0x prefix in '{}'", s))?;
	if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(format!("invalid hex '{}'", s));
	}
	u64::from_str_radix(digits, 16).map_err(|e| format!("invalid hex '{}': {}", s, e))
}

/// Trims surrounding whitespace and lowercases.
///
/// Used to canonicalize addresses so lookups are case-insensitive.
pub fn normalize_string(input: &str) -> String {
	input.trim().to_lowercase()
}
