//! # Validation Utilities
//!
//! Input validation helpers.

/// Validate that a string is not empty.
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{} cannot be empty", field_name))
    } else {
        Ok(())
    }
}

/// Normalise a display label into a lookup key ("Wallet Connect" -> "walletconnect").
pub fn to_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}
