//! # Wallet Backends
//!
//! Narrow boundaries to the two wallet technologies the connector speaks to:
//!
//! - [`eip1193`] - an injected browser provider (`window.ethereum`)
//! - [`pairing`] - a remote wallet reached through a pairing SDK (QR code / deep link)
//!
//! Browser bindings live in `wallet-web`; deterministic fakes live in
//! [`crate::mock`].

pub mod eip1193;
pub mod pairing;

pub use eip1193::{Eip1193Provider, ProviderError, ProviderEvent, ProviderListener, RpcMethod};
pub use pairing::{PairingClient, PairingListener, PairingSession, SessionApproval};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which wallet technology a handle talks to.
///
/// The serialized form is the value persisted in the session record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BackendKind {
    /// Browser-injected provider (MetaMask and compatible extensions).
    #[serde(rename = "metamask")]
    Injected,
    /// Remote mobile wallet over WalletConnect pairing.
    #[serde(rename = "walletconnect")]
    Remote,
}

impl BackendKind {
    pub fn key(&self) -> &'static str {
        match self {
            BackendKind::Injected => "metamask",
            BackendKind::Remote => "walletconnect",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BackendKind::Injected => "MetaMask",
            BackendKind::Remote => "WalletConnect",
        }
    }

    pub fn icon_url(&self) -> &'static str {
        match self {
            BackendKind::Injected => "https://assets.duelistking.com/metamask.png",
            BackendKind::Remote => "https://assets.duelistking.com/walletconnect.png",
        }
    }

    /// Parse a persisted or dialog key. Unknown keys yield `None`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "metamask" => Some(BackendKind::Injected),
            "walletconnect" => Some(BackendKind::Remote),
            _ => None,
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| format!("unknown backend kind: {}", s))
    }
}
