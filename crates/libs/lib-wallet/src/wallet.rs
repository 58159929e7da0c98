//! # Wallet Capability
//!
//! [`Wallet`] is the contract both adapters satisfy. Hosts never see the
//! adapters directly: they receive a [`WalletHandle`], a closed enum over the
//! two backend kinds that dereferences to `dyn Wallet`.
//!
//! ```rust,no_run
//! # async fn demo(wallet: lib_wallet::WalletHandle) -> lib_core::Result<()> {
//! let address = wallet.connect(56, false).await?;
//! let signature = wallet.sign_message("hello").await?;
//! # let _ = (address, signature);
//! # Ok(())
//! # }
//! ```

use crate::backend::BackendKind;
use crate::injected::InjectedWallet;
use crate::remote::RemoteWallet;
use async_trait::async_trait;
use lib_core::{ConnectorError, Result};
use lib_utils::to_checksum_address;
use serde::Serialize;
use shared::dto::TransactionRequest;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Listener for an external disconnect (access revoked, session killed remotely).
pub type DisconnectListener = Arc<dyn Fn(Option<ConnectorError>) + Send + Sync>;

/// Point-in-time view of a handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalletSnapshot {
    pub kind: BackendKind,
    pub address: String,
    pub chain_id: u64,
    pub connected: bool,
}

/// One connectable wallet backend.
#[async_trait(?Send)]
pub trait Wallet: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Request account access and make sure the backend is on `chain_id`.
    ///
    /// Fails with `InvalidChainId` for chain `0` before touching the backend,
    /// and with `ChainMismatch` when the backend stays on another chain and
    /// `ignore_chain_mismatch` is off.
    async fn connect(&self, chain_id: u64, ignore_chain_mismatch: bool) -> Result<String>;

    /// End the session and clear the cached account. Idempotent.
    async fn disconnect(&self) -> Result<()>;

    /// Cached account, re-queried from the backend when the cache is malformed.
    async fn get_address(&self) -> Result<String>;

    /// Chain associated with the handle, queried lazily.
    async fn chain_id(&self) -> Result<u64>;

    async fn switch_network(&self, chain_id: u64) -> Result<bool>;

    /// Returns the transaction hash.
    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String>;

    async fn sign_message(&self, message: &str) -> Result<String>;

    /// True iff the cached account is a well-formed address.
    fn is_connected(&self) -> bool;

    /// Every call adds a listener; register at most once per handle.
    fn on_disconnect(&self, listener: DisconnectListener);

    fn snapshot(&self) -> WalletSnapshot;
}

/// Capability object handed to hosts.
#[derive(Clone)]
pub enum WalletHandle {
    Injected(Arc<InjectedWallet>),
    Remote(Arc<RemoteWallet>),
}

impl WalletHandle {
    /// Registry key of the underlying adapter, unique per registry.
    pub fn key(&self) -> String {
        match self {
            WalletHandle::Injected(w) => format!("metamask:{}", w.instance()),
            WalletHandle::Remote(w) => format!("walletconnect:{}", w.instance()),
        }
    }

    /// Whether both handles point at the same adapter.
    pub fn same_as(&self, other: &WalletHandle) -> bool {
        match (self, other) {
            (WalletHandle::Injected(a), WalletHandle::Injected(b)) => Arc::ptr_eq(a, b),
            (WalletHandle::Remote(a), WalletHandle::Remote(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Deref for WalletHandle {
    type Target = dyn Wallet;

    fn deref(&self) -> &Self::Target {
        match self {
            WalletHandle::Injected(w) => w.as_ref(),
            WalletHandle::Remote(w) => w.as_ref(),
        }
    }
}

impl fmt::Debug for WalletHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletHandle")
            .field("key", &self.key())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

/// EIP-55 form of a well-formed account, the raw value otherwise.
pub(crate) fn normalize_account(raw: &str) -> String {
    to_checksum_address(raw).unwrap_or_else(|| raw.to_string())
}
