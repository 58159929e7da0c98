//! # Utilities Library
//!
//! Shared utility functions for chain ids, account addresses, and validation.

pub mod address;
pub mod chain_id;
pub mod validation;

// Re-export commonly used functions
pub use address::{is_address, to_checksum_address, same_address};
pub use chain_id::{to_chain_id_number, to_chain_id_string, ChainIdError};
pub use validation::{validate_not_empty, to_key};
