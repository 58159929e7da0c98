//! # Injected Provider Adapter
//!
//! [`InjectedWallet`] drives a browser-injected EIP-1193 provider. There is one
//! adapter per instance name in a [`WalletRegistry`](crate::WalletRegistry), so
//! every widget sharing the registry sees the same account and chain.

use crate::backend::{BackendKind, Eip1193Provider, ProviderEvent, RpcMethod};
use crate::network;
use crate::wallet::{normalize_account, DisconnectListener, Wallet, WalletSnapshot};
use async_trait::async_trait;
use lib_core::{ConnectorError, Result};
use lib_utils::{is_address, to_chain_id_number, to_chain_id_string};
use parking_lot::Mutex;
use serde_json::Value;
use shared::dto::{SwitchChainParams, TransactionRequest};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Listener for `accountsChanged`, called with checksummed accounts.
pub type AccountsListener = Arc<dyn Fn(Vec<String>) + Send + Sync>;

/// Listener for `chainChanged`.
pub type ChainListener = Arc<dyn Fn(u64) + Send + Sync>;

#[derive(Debug, Default)]
struct InjectedState {
    address: String,
    chain_id: u64,
    /// Set by `disconnect`; the provider keeps its authorization, so the
    /// address must not be re-queried until the next `connect`.
    released: bool,
}

pub struct InjectedWallet {
    instance: String,
    provider: Arc<dyn Eip1193Provider>,
    state: Arc<Mutex<InjectedState>>,
}

impl InjectedWallet {
    pub fn new(instance: impl Into<String>, provider: Arc<dyn Eip1193Provider>) -> Self {
        Self {
            instance: instance.into(),
            provider,
            state: Arc::new(Mutex::new(InjectedState::default())),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// Subscribe to account switches. The cached account is updated first.
    pub fn on_accounts_changed(&self, listener: AccountsListener) {
        let state = Arc::clone(&self.state);
        self.provider.on(
            ProviderEvent::AccountsChanged,
            Arc::new(move |payload| {
                let accounts = parse_accounts(&payload);
                if let Some(first) = accounts.first() {
                    let mut state = state.lock();
                    if !state.released {
                        state.address = first.clone();
                    }
                }
                listener(accounts);
            }),
        );
    }

    /// Subscribe to chain switches. The cached chain is updated first.
    pub fn on_chain_changed(&self, listener: ChainListener) {
        let state = Arc::clone(&self.state);
        self.provider.on(
            ProviderEvent::ChainChanged,
            Arc::new(move |payload| match parse_chain_id(&payload) {
                Ok(chain_id) => {
                    state.lock().chain_id = chain_id;
                    listener(chain_id);
                }
                Err(err) => warn!(error = %err, "ignoring malformed chainChanged payload"),
            }),
        );
    }

    async fn request_chain_id(&self) -> Result<(String, u64)> {
        let raw = self.provider.request(RpcMethod::ChainId, Value::Null).await?;
        let chain_id = parse_chain_id(&raw)?;
        let hex = match &raw {
            Value::String(s) => s.trim().to_lowercase(),
            _ => to_chain_id_string(chain_id),
        };
        Ok((hex, chain_id))
    }

    async fn request_switch(&self, params: &Value) -> std::result::Result<Value, crate::backend::ProviderError> {
        self.provider.request(RpcMethod::SwitchEthereumChain, params.clone()).await
    }
}

#[async_trait(?Send)]
impl Wallet for InjectedWallet {
    fn kind(&self) -> BackendKind {
        BackendKind::Injected
    }

    async fn connect(&self, chain_id: u64, ignore_chain_mismatch: bool) -> Result<String> {
        if chain_id == 0 {
            return Err(ConnectorError::InvalidChainId);
        }

        let accounts = self.provider.request(RpcMethod::RequestAccounts, Value::Null).await?;
        let address = parse_accounts(&accounts)
            .into_iter()
            .next()
            .ok_or_else(|| ConnectorError::Decoding("provider returned no accounts".to_string()))?;
        let (current_hex, current) = self.request_chain_id().await?;

        {
            let mut state = self.state.lock();
            state.address = address.clone();
            state.chain_id = current;
            state.released = false;
        }

        if ignore_chain_mismatch {
            debug!(chain_id = current, target = chain_id, "chain check skipped");
            return Ok(address);
        }

        if current_hex != to_chain_id_string(chain_id) {
            info!(from = current, to = chain_id, "injected wallet on another chain, switching");
            match self.switch_network(chain_id).await {
                Ok(true) => {}
                Ok(false) => return Err(network::chain_mismatch(chain_id, current)),
                Err(err) => {
                    warn!(error = %err, chain_id, "network switch failed");
                    return Err(network::chain_mismatch(chain_id, current));
                }
            }
        }

        Ok(address)
    }

    async fn disconnect(&self) -> Result<()> {
        let mut state = self.state.lock();
        state.address.clear();
        state.released = true;
        Ok(())
    }

    async fn get_address(&self) -> Result<String> {
        let (cached, released) = {
            let state = self.state.lock();
            (state.address.clone(), state.released)
        };
        if is_address(&cached) || released {
            return Ok(cached);
        }

        let accounts = self.provider.request(RpcMethod::Accounts, Value::Null).await?;
        match parse_accounts(&accounts).into_iter().next() {
            Some(address) if is_address(&address) => {
                self.state.lock().address = address.clone();
                Ok(address)
            }
            _ => Ok(cached),
        }
    }

    async fn chain_id(&self) -> Result<u64> {
        let cached = self.state.lock().chain_id;
        if cached != 0 {
            return Ok(cached);
        }
        let (_, chain_id) = self.request_chain_id().await?;
        self.state.lock().chain_id = chain_id;
        Ok(chain_id)
    }

    /// Switch, registering the chain first when the wallet does not know it.
    async fn switch_network(&self, chain_id: u64) -> Result<bool> {
        let params = Value::Array(vec![serde_json::to_value(SwitchChainParams {
            chain_id: to_chain_id_string(chain_id),
        })?]);

        match self.request_switch(&params).await {
            Ok(_) => {}
            Err(err) if err.is_unknown_chain() => {
                let add = network::add_chain_params(chain_id)
                    .ok_or(ConnectorError::UnsupportedNetwork(chain_id))?;
                info!(chain_id, "registering network with injected wallet");
                self.provider
                    .request(RpcMethod::AddEthereumChain, Value::Array(vec![serde_json::to_value(add)?]))
                    .await?;
                self.request_switch(&params).await?;
            }
            Err(err) => return Err(err.into()),
        }

        self.state.lock().chain_id = chain_id;
        Ok(true)
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String> {
        let params = Value::Array(vec![serde_json::to_value(tx)?]);
        let hash = self.provider.request(RpcMethod::SendTransaction, params).await?;
        as_string(hash)
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let address = self.get_address().await?;
        let params = Value::Array(vec![Value::String(message.to_string()), Value::String(address)]);
        let signature = self.provider.request(RpcMethod::PersonalSign, params).await?;
        as_string(signature)
    }

    fn is_connected(&self) -> bool {
        is_address(&self.state.lock().address)
    }

    fn on_disconnect(&self, listener: DisconnectListener) {
        let state = Arc::clone(&self.state);
        self.provider.on(
            ProviderEvent::Disconnect,
            Arc::new(move |_| {
                state.lock().address.clear();
                listener(None);
            }),
        );
    }

    fn snapshot(&self) -> WalletSnapshot {
        let state = self.state.lock();
        WalletSnapshot {
            kind: BackendKind::Injected,
            address: state.address.clone(),
            chain_id: state.chain_id,
            connected: is_address(&state.address),
        }
    }
}

/// Accounts from an `eth_accounts`-style array, checksummed.
fn parse_accounts(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(normalize_account)
                .collect()
        })
        .unwrap_or_default()
}

/// Chain ids arrive as hex strings, some providers send plain numbers.
fn parse_chain_id(value: &Value) -> Result<u64> {
    match value {
        Value::String(s) => Ok(to_chain_id_number(s)?),
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| ConnectorError::Decoding(format!("chain id is not an integer: {}", n))),
        other => Err(ConnectorError::Decoding(format!("unexpected chain id: {}", other))),
    }
}

fn as_string(value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(ConnectorError::Decoding(format!("expected a string, got {}", other))),
    }
}
