//! # Account Address Helpers
//!
//! Well-formedness follows the usual wallet rule: 20 bytes of hex with an
//! optional `0x` prefix, and if the string mixes upper and lower case it must
//! carry a valid EIP-55 checksum.

use alloy_primitives::Address;
use std::str::FromStr;

/// Check whether `value` is a well-formed account address.
pub fn is_address(value: &str) -> bool {
    if Address::from_str(value).is_err() {
        return false;
    }

    let digits = value.strip_prefix("0x").unwrap_or(value);
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let prefixed = format!("0x{digits}");
        return Address::parse_checksummed(&prefixed, None).is_ok();
    }

    true
}

/// Format a well-formed address with its EIP-55 checksum.
///
/// Returns `None` when `value` is not an address.
pub fn to_checksum_address(value: &str) -> Option<String> {
    if !is_address(value) {
        return None;
    }
    Address::from_str(value).ok().map(|address| address.to_checksum(None))
}

/// Compare two addresses ignoring checksum casing.
pub fn same_address(a: &str, b: &str) -> bool {
    match (Address::from_str(a), Address::from_str(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a.eq_ignore_ascii_case(b),
    }
}
