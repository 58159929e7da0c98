//! # Centralized Error Handling
//!
//! This module defines the connector-wide error type [`ConnectorError`] used by
//! every adapter and by the orchestrator. It follows the `thiserror` pattern.
//!
//! ## Design Philosophy
//!
//! - **Single Error Type**: Adapters reject with `ConnectorError`, the orchestrator
//!   turns every rejection into an error modal
//! - **Displayable**: [`ConnectorError::title`] is the modal title, `Display` is the
//!   modal message
//! - **Cloneable**: Errors travel through disconnect listeners and host callbacks
//!
//! ## Error Categories
//!
//! 1. **Host input** - the widget was asked for something it cannot do
//!    - [`InvalidChainId`](ConnectorError::InvalidChainId)
//!    - [`UnsupportedNetwork`](ConnectorError::UnsupportedNetwork)
//!    - [`Config`](ConnectorError::Config)
//!
//! 2. **Backend state** - the wallet is not where we need it
//!    - [`ChainMismatch`](ConnectorError::ChainMismatch)
//!    - [`BackendUnavailable`](ConnectorError::BackendUnavailable)
//!    - [`BackendRejected`](ConnectorError::BackendRejected)
//!
//! 3. **Transport** - the backend failed or answered nonsense
//!    - [`TransportFailure`](ConnectorError::TransportFailure)
//!    - [`Decoding`](ConnectorError::Decoding)
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{ConnectorError, Result};
//!
//! fn target_chain(chain_id: u64) -> Result<u64> {
//!     if chain_id == 0 {
//!         return Err(ConnectorError::InvalidChainId);
//!     }
//!     Ok(chain_id)
//! }
//!
//! assert_eq!(target_chain(0).unwrap_err().title(), "Invalid chain id");
//! ```
//!
//! ## Error Conversion
//!
//! - `From<serde_json::Error>` - malformed backend payloads become `Decoding`
//! - `From<lib_utils::ChainIdError>` - unparsable chain ids become `Decoding`

use lib_utils::ChainIdError;
use thiserror::Error;

/// Convenience type alias for `Result<T, ConnectorError>`.
pub type Result<T> = std::result::Result<T, ConnectorError>;

/// Connector-wide error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectorError {
    /// Target chain is zero or absent.
    #[error("Invalid chain id: a connection needs a non-zero chain id")]
    InvalidChainId,

    /// Target chain is not in the network registry.
    #[error("Unsupported network with chain Id: {0}")]
    UnsupportedNetwork(u64),

    /// The backend's active chain differs from the target and could not be switched.
    #[error("Chain mismatch: wallet is on {actual_name} ({actual}), please connect to {expected_name} ({expected})")]
    ChainMismatch {
        expected: u64,
        expected_name: String,
        actual: u64,
        actual_name: String,
    },

    /// The backend is not present (no injected provider on the page).
    #[error("{0}")]
    BackendUnavailable(String),

    /// The user declined the request in their wallet.
    #[error("Request rejected: {0}")]
    BackendRejected(String),

    /// Pairing or provider transport error.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Backend answered with a payload we cannot read.
    #[error("Decoding error: {0}")]
    Decoding(String),

    /// Configuration rejected by [`ConnectorConfig::validate`](crate::config::ConnectorConfig::validate).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConnectorError {
    /// Short title for the error modal.
    pub fn title(&self) -> &'static str {
        match self {
            ConnectorError::InvalidChainId => "Invalid chain id",
            ConnectorError::UnsupportedNetwork(_) => "Unsupported network",
            ConnectorError::ChainMismatch { .. } => "Wrong network",
            ConnectorError::BackendUnavailable(_) => "Metamask Not Found",
            ConnectorError::BackendRejected(_) => "Connection rejected",
            ConnectorError::TransportFailure(_) => "Wallet connection failed",
            ConnectorError::Decoding(_) => "Unexpected wallet response",
            ConnectorError::Config(_) => "Invalid configuration",
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(err: serde_json::Error) -> Self {
        ConnectorError::Decoding(format!("JSON error: {}", err))
    }
}

impl From<ChainIdError> for ConnectorError {
    fn from(err: ChainIdError) -> Self {
        ConnectorError::Decoding(err.to_string())
    }
}
