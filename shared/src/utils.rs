//! # Shared Utility Functions
//!
//! Common utility functions used by the connector core and the wallet-web widget.
//!
//! ## Address Formatting
//!
//! Functions for formatting EVM account addresses for display:
//! - [`format_address`] - Format address with ellipsis (first N and last M characters)
//! - [`truncate_address`] - `0x1234...7890` style, the form the connect button shows
//!
//! ## Usage
//!
//! ```rust
//! use shared::utils::format_address;
//!
//! let address = "0x1234567890123456789012345678901234567890";
//! let formatted = format_address(address, 6, 4);
//! assert_eq!(formatted, "0x1234...7890");
//! ```

/// Format an address by showing the first `prefix_len` and last `suffix_len` characters.
///
/// If the address is shorter than `prefix_len + suffix_len`, it is returned as-is.
///
/// # Arguments
///
/// * `address` - The account address to format
/// * `prefix_len` - Number of characters to show at the start (including `0x`)
/// * `suffix_len` - Number of characters to show at the end
///
/// # Examples
///
/// ```rust
/// use shared::utils::format_address;
///
/// let addr = "0x1234567890123456789012345678901234567890";
/// assert_eq!(format_address(addr, 6, 4), "0x1234...7890");
/// assert_eq!(format_address(addr, 4, 4), "0x12...7890");
/// assert_eq!(format_address("0x12", 4, 4), "0x12");
/// ```
pub fn format_address(address: &str, prefix_len: usize, suffix_len: usize) -> String {
    let address_len = address.len();

    if address_len <= prefix_len + suffix_len {
        return address.to_string();
    }

    // Non-ASCII input is not an address; hand it back rather than split a char
    match (address.get(..prefix_len), address.get(address_len - suffix_len..)) {
        (Some(prefix), Some(suffix)) => format!("{}...{}", prefix, suffix),
        _ => address.to_string(),
    }
}

/// Format an address as `0x1234...7890`.
///
/// # Examples
///
/// ```rust
/// use shared::utils::truncate_address;
///
/// let addr = "0x1234567890123456789012345678901234567890";
/// assert_eq!(truncate_address(addr), "0x1234...7890");
/// ```
pub fn truncate_address(address: &str) -> String {
    format_address(address, 6, 4)
}
