//! # Data Transfer Objects (DTOs)
//!
//! Payloads handed to wallet backends.
//!
//! ## Module Organization
//!
//! - [`network`] - Network metadata used to register an unknown chain with a wallet
//! - [`transaction`] - Transaction fields accepted by `eth_sendTransaction`
//!
//! ## Serialization Format
//!
//! - **Field naming**: camelCase (`#[serde(rename_all = "camelCase")]`), matching the wallet APIs
//! - **Optional fields**: Omitted when `None` using `#[serde(skip_serializing_if = "Option::is_none")]`
//!
//! ## Example JSON
//!
//! ```text
//! wallet_addEthereumChain
//!
//! {
//!   "chainId": "0x38",
//!   "chainName": "Binance Smart Chain",
//!   "nativeCurrency": { "name": "BNB", "symbol": "BNB", "decimals": 18 },
//!   "rpcUrls": ["https://bsc-dataseed.binance.org/"],
//!   "blockExplorerUrls": ["https://bscscan.com/"]
//! }
//! ```

pub mod network;
pub mod transaction;

pub use network::*;
pub use transaction::*;
