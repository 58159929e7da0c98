//! # Connector Configuration
//!
//! This module holds the widget configuration surface. Every field has a
//! default, so a host only spells out what it changes.
//!
//! ## Loading
//!
//! The browser has no process environment, so instead of reading env vars the
//! configuration is built in code or parsed from a JSON blob the host embeds
//! in the page:
//!
//! ```rust
//! use lib_core::config::ConnectorConfig;
//!
//! let config = ConnectorConfig::from_json(r#"{ "chain_id": 137, "ignore_chain_mismatch": true }"#)?;
//! assert_eq!(config.chain_id, 137);
//! assert_eq!(config.injected_instance, "metamask");
//! # Ok::<(), lib_core::ConnectorError>(())
//! ```
//!
//! Configuration is validated when loaded to fail fast if misconfigured.

use crate::error::{ConnectorError, Result};
use lib_utils::validate_not_empty;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Binance Smart Chain.
pub const DEFAULT_CHAIN_ID: u64 = 56;

pub const DEFAULT_DIALOG_TITLE: &str = "Choose supported wallet";

pub const DEFAULT_PAIRING_BRIDGE: &str = "https://bridge.walletconnect.org";

/// Widget configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectorConfig {
    /// Network the host wants the wallet on.
    pub chain_id: u64,

    /// Accept a wallet on another chain instead of switching or failing.
    pub ignore_chain_mismatch: bool,

    /// Never render the disconnect button.
    pub hide_disconnect_button: bool,

    /// Render only the dialog and modal; the host drives the widget imperatively.
    pub invisible: bool,

    /// Title of the wallet selection dialog.
    pub dialog_title: String,

    /// Registry key of the injected-provider handle.
    pub injected_instance: String,

    /// Registry key prefix of the remote-pairing handles (suffixed with the chain id).
    pub remote_instance: String,

    /// Prefix of the two session keys in page storage.
    pub storage_namespace: String,

    /// Bridge server handed to the pairing SDK.
    pub pairing_bridge: String,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            chain_id: DEFAULT_CHAIN_ID,
            ignore_chain_mismatch: false,
            hide_disconnect_button: false,
            invisible: false,
            dialog_title: DEFAULT_DIALOG_TITLE.to_string(),
            injected_instance: "metamask".to_string(),
            remote_instance: "wallet-connect".to_string(),
            storage_namespace: "wallet-connector".to_string(),
            pairing_bridge: DEFAULT_PAIRING_BRIDGE.to_string(),
        }
    }
}

impl ConnectorConfig {
    /// Default configuration targeting `chain_id`.
    pub fn for_chain(chain_id: u64) -> Self {
        Self {
            chain_id,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON configuration blob.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| ConnectorError::Config(format!("invalid connector config: {}", e)))?;
        config.validate()?;
        debug!(chain_id = config.chain_id, namespace = %config.storage_namespace, "connector config loaded");
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Whether the chain is *supported* is checked later, when the user asks to
    /// connect, so that the widget can report it in its modal.
    pub fn validate(&self) -> Result<()> {
        if self.chain_id == 0 {
            return Err(ConnectorError::InvalidChainId);
        }

        for (value, field) in [
            (&self.injected_instance, "injected_instance"),
            (&self.remote_instance, "remote_instance"),
            (&self.storage_namespace, "storage_namespace"),
            (&self.pairing_bridge, "pairing_bridge"),
        ] {
            validate_not_empty(value, field).map_err(ConnectorError::Config)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectorConfig::default();
        assert_eq!(config.chain_id, 56);
        assert!(!config.ignore_chain_mismatch);
        assert_eq!(config.storage_namespace, "wallet-connector");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = ConnectorConfig::from_json(r#"{ "chain_id": 4002, "invisible": true }"#).unwrap();
        assert_eq!(config.chain_id, 4002);
        assert!(config.invisible);
        assert_eq!(config.dialog_title, DEFAULT_DIALOG_TITLE);
    }

    #[test]
    fn test_from_json_rejects_zero_chain() {
        let err = ConnectorConfig::from_json(r#"{ "chain_id": 0 }"#).unwrap_err();
        assert_eq!(err, ConnectorError::InvalidChainId);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        let err = ConnectorConfig::from_json("{ chain_id: }").unwrap_err();
        assert!(matches!(err, ConnectorError::Config(_)));
    }

    #[test]
    fn test_validate_empty_instance() {
        let config = ConnectorConfig {
            injected_instance: " ".to_string(),
            ..ConnectorConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConnectorError::Config("injected_instance cannot be empty".to_string()))
        );
    }
}
