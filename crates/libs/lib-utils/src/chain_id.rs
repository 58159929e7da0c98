//! # Chain Id Conversion
//!
//! Wallets speak `0x`-prefixed lowercase hex, hosts speak integers.

/// Format a numeric chain id the way wallets report it (`56` -> `"0x38"`).
pub fn to_chain_id_string(chain_id: u64) -> String {
    format!("0x{:x}", chain_id)
}

/// Parse a hex chain id, with or without the `0x` prefix.
///
/// Surrounding whitespace is ignored and the prefix is case-insensitive.
pub fn to_chain_id_number(chain_id: &str) -> Result<u64, ChainIdError> {
    let trimmed = chain_id.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
        .trim();

    if digits.is_empty() {
        return Err(ChainIdError::Empty);
    }

    u64::from_str_radix(digits, 16).map_err(|_| ChainIdError::WrongFormat(chain_id.to_string()))
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainIdError {
    Empty,
    WrongFormat(String),
}

impl std::fmt::Display for ChainIdError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ChainIdError::Empty => write!(fmt, "chain id is empty"),
            ChainIdError::WrongFormat(raw) => write!(fmt, "chain id is not hex: {raw}"),
        }
    }
}

impl std::error::Error for ChainIdError {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_chain_id_string() {
        assert_eq!(to_chain_id_string(1), "0x1");
        assert_eq!(to_chain_id_string(56), "0x38");
        assert_eq!(to_chain_id_string(4002), "0xfa2");
        assert_eq!(to_chain_id_string(31337), "0x7a69");
    }

    #[test]
    fn test_to_chain_id_number() {
        assert_eq!(to_chain_id_number("0x38"), Ok(56));
        assert_eq!(to_chain_id_number("0X89"), Ok(137));
        assert_eq!(to_chain_id_number(" 0xfa "), Ok(250));
        assert_eq!(to_chain_id_number("13881"), Ok(80001));
    }

    #[test]
    fn test_to_chain_id_number_rejects_garbage() {
        assert_eq!(to_chain_id_number("0x"), Err(ChainIdError::Empty));
        assert!(matches!(to_chain_id_number("0xzz"), Err(ChainIdError::WrongFormat(_))));
    }

    #[test]
    fn test_round_trip_known_chains() {
        for chain_id in [1u64, 56, 137, 250, 4002, 31337, 80001, u64::MAX] {
            assert_eq!(to_chain_id_number(&to_chain_id_string(chain_id)), Ok(chain_id));
        }
    }
}
