//! # Shared Data Transfer Objects Library
//!
//! This library defines the payloads that cross the wallet backend boundary.
//! Both the connector core (`lib-wallet`) and the browser widget (`wallet-web`)
//! serialize these types with `serde` before handing them to a provider.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects sent to wallet backends
//!   - **[`dto::network`]**: Network registration payload (`wallet_addEthereumChain`)
//!   - **[`dto::transaction`]**: Transaction request (`eth_sendTransaction`)
//! - **[`utils`]**: Shared utility functions
//!   - **[`utils::format_address`]**: Format account addresses for display
//!   - **[`utils::truncate_address`]**: Truncate addresses with ellipsis
//!
//! ## Wire Format
//!
//! Unlike typical Rust DTOs these use **camelCase** field names, because the
//! receiving side is a JavaScript wallet that expects the EIP-1193 / EIP-3085
//! field names verbatim:
//!
//! ```rust
//! use shared::dto::transaction::TransactionRequest;
//!
//! let tx = TransactionRequest::new(
//!     "0x1000000000000000000000000000000000000001",
//!     "0x2000000000000000000000000000000000000002",
//! )
//! .with_value("0x1");
//!
//! let json = serde_json::to_value(&tx).unwrap();
//! assert_eq!(json["value"], "0x1");
//! assert!(json.get("gasLimit").is_none());
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
pub use dto::*;
pub use utils::*;
