//! # EIP-1193 Provider Boundary
//!
//! The injected provider is a request/response object plus an event emitter.
//! Only the methods and events the connector uses are modelled.

use async_trait::async_trait;
use lib_core::ConnectorError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// User rejected the request.
pub const USER_REJECTED: i64 = 4001;

/// Chain has not been added to the wallet.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;

/// Some mobile builds report an unknown chain as an internal error.
pub const INTERNAL_ERROR: i64 = -32603;

/// Listener for provider events. The payload is the raw event argument.
pub type ProviderListener = Arc<dyn Fn(Value) + Send + Sync>;

/// JSON-RPC methods sent to the injected provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RpcMethod {
    RequestAccounts,
    Accounts,
    ChainId,
    SendTransaction,
    SwitchEthereumChain,
    AddEthereumChain,
    PersonalSign,
}

impl RpcMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RpcMethod::RequestAccounts => "eth_requestAccounts",
            RpcMethod::Accounts => "eth_accounts",
            RpcMethod::ChainId => "eth_chainId",
            RpcMethod::SendTransaction => "eth_sendTransaction",
            RpcMethod::SwitchEthereumChain => "wallet_switchEthereumChain",
            RpcMethod::AddEthereumChain => "wallet_addEthereumChain",
            RpcMethod::PersonalSign => "personal_sign",
        }
    }
}

/// Provider events the connector subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderEvent {
    Disconnect,
    ChainChanged,
    AccountsChanged,
}

impl ProviderEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderEvent::Disconnect => "disconnect",
            ProviderEvent::ChainChanged => "chainChanged",
            ProviderEvent::AccountsChanged => "accountsChanged",
        }
    }
}

/// EIP-1193 error object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message} (code {code})")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether a switch request failed because the wallet does not know the chain.
    pub fn is_unknown_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN || self.code == INTERNAL_ERROR
    }
}

impl From<ProviderError> for ConnectorError {
    fn from(err: ProviderError) -> Self {
        match err.code {
            USER_REJECTED => ConnectorError::BackendRejected(err.message),
            _ => ConnectorError::TransportFailure(err.to_string()),
        }
    }
}

/// Injected provider (`window.ethereum` in a browser).
///
/// Futures are `?Send`: browser promises cannot cross threads.
#[async_trait(?Send)]
pub trait Eip1193Provider: Send + Sync {
    /// Send one JSON-RPC request. `params` is the positional parameter array,
    /// or `Value::Null` for none.
    async fn request(&self, method: RpcMethod, params: Value) -> Result<Value, ProviderError>;

    /// Subscribe to a provider event. Every call adds a listener.
    fn on(&self, event: ProviderEvent, listener: ProviderListener);
}
