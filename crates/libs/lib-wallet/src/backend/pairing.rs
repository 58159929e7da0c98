//! # Pairing SDK Boundary
//!
//! The remote wallet is reached through a pairing client (WalletConnect v1).
//! Each [`PairingSession`] is one SDK connector object; it is persisted by the
//! SDK under a storage id and cannot be reused across chains.

use async_trait::async_trait;
use lib_core::Result;
use serde::{Deserialize, Serialize};
use shared::dto::TransactionRequest;
use std::sync::Arc;

/// Listener for a session disconnect. Carries the SDK error message, if any.
pub type PairingListener = Arc<dyn Fn(Option<String>) + Send + Sync>;

/// What the remote peer reports when it accepts a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionApproval {
    pub accounts: Vec<String>,
    pub chain_id: u64,
}

#[async_trait(?Send)]
pub trait PairingSession: Send + Sync {
    /// Whether the SDK holds an approved session.
    fn is_connected(&self) -> bool;

    /// Accounts of the approved session, empty when not connected.
    fn accounts(&self) -> Vec<String>;

    /// Chain of the approved session, `0` when not connected.
    fn chain_id(&self) -> u64;

    /// Start the handshake; resolves once the peer accepts or rejects.
    async fn create_session(&self, chain_id: u64) -> Result<SessionApproval>;

    async fn kill_session(&self) -> Result<()>;

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String>;

    /// `params` is `[message, address]`.
    async fn sign_personal_message(&self, params: [String; 2]) -> Result<String>;

    fn on_disconnect(&self, listener: PairingListener);
}

/// Factory for pairing sessions.
pub trait PairingClient: Send + Sync {
    /// Construct a fresh session object, restoring whatever the SDK persisted
    /// under `storage_id`.
    fn open(&self, storage_id: &str) -> Arc<dyn PairingSession>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_approval_camel_case() {
        let approval: SessionApproval = serde_json::from_value(serde_json::json!({
            "accounts": ["0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"],
            "chainId": 137
        }))
        .unwrap();
        assert_eq!(approval.chain_id, 137);
        assert_eq!(approval.accounts.len(), 1);
    }
}
