//! # Deterministic Backends
//!
//! In-process stand-ins for the injected provider and the pairing SDK. They
//! back the unit and integration tests and the `?mock=1` mode of the demo
//! page, so they answer instantly and predictably.

use crate::backend::eip1193::{UNRECOGNIZED_CHAIN, USER_REJECTED};
use crate::backend::{
    Eip1193Provider, PairingClient, PairingListener, PairingSession, ProviderError, ProviderEvent,
    ProviderListener, RpcMethod, SessionApproval,
};
use async_trait::async_trait;
use lib_core::{ConnectorError, Result};
use lib_utils::{to_chain_id_number, to_chain_id_string};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared::dto::TransactionRequest;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Weak};

// region:    --- Injected provider

#[derive(Debug)]
struct EthereumState {
    accounts: Vec<String>,
    chain_id: u64,
    known_chains: HashSet<u64>,
    authorized: bool,
    reject_requests: bool,
    reject_switch: bool,
    calls: Vec<RpcMethod>,
}

/// Fake `window.ethereum`.
///
/// Knows chain 1 and its starting chain; other chains must be registered
/// with `wallet_addEthereumChain` before a switch succeeds.
pub struct MockEthereum {
    state: Mutex<EthereumState>,
    listeners: Mutex<HashMap<ProviderEvent, Vec<ProviderListener>>>,
}

impl MockEthereum {
    pub fn new(accounts: Vec<String>, chain_id: u64) -> Self {
        Self {
            state: Mutex::new(EthereumState {
                accounts,
                chain_id,
                known_chains: HashSet::from([1, chain_id]),
                authorized: false,
                reject_requests: false,
                reject_switch: false,
                calls: Vec::new(),
            }),
            listeners: Mutex::new(HashMap::new()),
        }
    }

    /// Methods requested so far, in order.
    pub fn calls(&self) -> Vec<RpcMethod> {
        self.state.lock().calls.clone()
    }

    pub fn current_chain(&self) -> u64 {
        self.state.lock().chain_id
    }

    pub fn add_known_chain(&self, chain_id: u64) {
        self.state.lock().known_chains.insert(chain_id);
    }

    /// Pretend the site was authorized in an earlier page load.
    pub fn set_authorized(&self, authorized: bool) {
        self.state.lock().authorized = authorized;
    }

    /// Reject `eth_requestAccounts` as if the user closed the prompt.
    pub fn set_reject_requests(&self, reject: bool) {
        self.state.lock().reject_requests = reject;
    }

    pub fn set_reject_switch(&self, reject: bool) {
        self.state.lock().reject_switch = reject;
    }

    /// Number of listeners subscribed to `event`.
    pub fn listener_count(&self, event: ProviderEvent) -> usize {
        self.listeners.lock().get(&event).map_or(0, Vec::len)
    }

    /// Simulate the user picking another account in the extension.
    pub fn emit_accounts_changed(&self, accounts: Vec<String>) {
        self.state.lock().accounts = accounts.clone();
        self.emit(ProviderEvent::AccountsChanged, json!(accounts));
    }

    /// Simulate the user switching network in the extension.
    pub fn emit_chain_changed(&self, chain_id: u64) {
        self.state.lock().chain_id = chain_id;
        self.emit(ProviderEvent::ChainChanged, json!(to_chain_id_string(chain_id)));
    }

    pub fn emit_disconnect(&self) {
        self.state.lock().authorized = false;
        self.emit(
            ProviderEvent::Disconnect,
            json!({ "code": 4900, "message": "Disconnected" }),
        );
    }

    fn emit(&self, event: ProviderEvent, payload: Value) {
        let listeners = self.listeners.lock().get(&event).cloned().unwrap_or_default();
        for listener in listeners {
            listener(payload.clone());
        }
    }

    fn switch(&self, params: &Value) -> std::result::Result<Value, ProviderError> {
        let target = params
            .get(0)
            .and_then(|p| p.get("chainId"))
            .and_then(Value::as_str)
            .and_then(|hex| to_chain_id_number(hex).ok())
            .ok_or_else(|| ProviderError::new(-32602, "Invalid params"))?;

        {
            let state = self.state.lock();
            if state.reject_switch {
                return Err(ProviderError::new(USER_REJECTED, "User rejected the request."));
            }
            if !state.known_chains.contains(&target) {
                return Err(ProviderError::new(
                    UNRECOGNIZED_CHAIN,
                    format!("Unrecognized chain ID \"{}\"", to_chain_id_string(target)),
                ));
            }
        }

        self.emit_chain_changed(target);
        Ok(Value::Null)
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for MockEthereum {
    async fn request(&self, method: RpcMethod, params: Value) -> std::result::Result<Value, ProviderError> {
        let mut state = self.state.lock();
        state.calls.push(method);

        match method {
            RpcMethod::RequestAccounts => {
                if state.reject_requests {
                    return Err(ProviderError::new(USER_REJECTED, "User rejected the request."));
                }
                state.authorized = true;
                Ok(json!(state.accounts))
            }
            RpcMethod::Accounts => {
                if state.authorized {
                    Ok(json!(state.accounts))
                } else {
                    Ok(json!([]))
                }
            }
            RpcMethod::ChainId => Ok(json!(to_chain_id_string(state.chain_id))),
            RpcMethod::SwitchEthereumChain => {
                drop(state);
                self.switch(&params)
            }
            RpcMethod::AddEthereumChain => {
                let chain_id = params
                    .get(0)
                    .and_then(|p| p.get("chainId"))
                    .and_then(Value::as_str)
                    .and_then(|hex| to_chain_id_number(hex).ok())
                    .ok_or_else(|| ProviderError::new(-32602, "Invalid params"))?;
                state.known_chains.insert(chain_id);
                Ok(Value::Null)
            }
            RpcMethod::SendTransaction => Ok(json!(format!("0x{:064x}", state.calls.len()))),
            RpcMethod::PersonalSign => Ok(json!(format!("0x{:0130x}", state.calls.len()))),
        }
    }

    fn on(&self, event: ProviderEvent, listener: ProviderListener) {
        self.listeners.lock().entry(event).or_default().push(listener);
    }
}

// endregion: --- Injected provider

// region:    --- Pairing SDK

#[derive(Debug)]
struct Peer {
    accounts: Vec<String>,
    chain_id: u64,
    reject: bool,
}

#[derive(Default)]
struct PairingShared {
    persisted: Mutex<HashMap<String, SessionApproval>>,
    opened: Mutex<Vec<Arc<MockPairingSession>>>,
    sessions_created: Mutex<usize>,
}

/// Fake pairing client with one remote peer that approves instantly.
///
/// Sessions persist per storage id across `open` calls, like the SDK's
/// local storage does across page loads.
#[derive(Clone)]
pub struct MockPairing {
    peer: Arc<Mutex<Peer>>,
    shared: Arc<PairingShared>,
}

impl MockPairing {
    /// Peer holding `accounts`, sitting on `chain_id`.
    pub fn new(accounts: Vec<String>, chain_id: u64) -> Self {
        Self {
            peer: Arc::new(Mutex::new(Peer {
                accounts,
                chain_id,
                reject: false,
            })),
            shared: Arc::new(PairingShared::default()),
        }
    }

    /// Reject the next handshakes.
    pub fn set_reject(&self, reject: bool) {
        self.peer.lock().reject = reject;
    }

    pub fn set_peer_chain(&self, chain_id: u64) {
        self.peer.lock().chain_id = chain_id;
    }

    pub fn is_persisted(&self, storage_id: &str) -> bool {
        self.shared.persisted.lock().contains_key(storage_id)
    }

    /// Number of `create_session` handshakes started.
    pub fn sessions_created(&self) -> usize {
        *self.shared.sessions_created.lock()
    }

    /// Simulate the peer ending the session from the phone.
    pub fn remote_disconnect(&self, storage_id: &str, error: Option<&str>) {
        self.shared.persisted.lock().remove(storage_id);
        let sessions: Vec<_> = self
            .shared
            .opened
            .lock()
            .iter()
            .filter(|s| s.storage_id == storage_id)
            .cloned()
            .collect();
        for session in sessions {
            session.drop_session(error.map(str::to_string));
        }
    }
}

impl PairingClient for MockPairing {
    fn open(&self, storage_id: &str) -> Arc<dyn PairingSession> {
        let restored = self.shared.persisted.lock().get(storage_id).cloned();
        let session = Arc::new(MockPairingSession {
            storage_id: storage_id.to_string(),
            peer: Arc::clone(&self.peer),
            shared: Arc::downgrade(&self.shared),
            approval: Mutex::new(restored),
            listeners: Mutex::new(Vec::new()),
        });
        self.shared.opened.lock().push(Arc::clone(&session));
        session
    }
}

pub struct MockPairingSession {
    storage_id: String,
    peer: Arc<Mutex<Peer>>,
    shared: Weak<PairingShared>,
    approval: Mutex<Option<SessionApproval>>,
    listeners: Mutex<Vec<PairingListener>>,
}

impl MockPairingSession {
    fn drop_session(&self, error: Option<String>) {
        let was_connected = self.approval.lock().take().is_some();
        if !was_connected {
            return;
        }
        let listeners = self.listeners.lock().clone();
        for listener in listeners {
            listener(error.clone());
        }
    }

    fn forget(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.persisted.lock().remove(&self.storage_id);
        }
    }

    fn require_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(ConnectorError::TransportFailure("Session currently disconnected".to_string()))
        }
    }
}

#[async_trait(?Send)]
impl PairingSession for MockPairingSession {
    fn is_connected(&self) -> bool {
        self.approval.lock().is_some()
    }

    fn accounts(&self) -> Vec<String> {
        self.approval
            .lock()
            .as_ref()
            .map(|a| a.accounts.clone())
            .unwrap_or_default()
    }

    fn chain_id(&self) -> u64 {
        self.approval.lock().as_ref().map(|a| a.chain_id).unwrap_or(0)
    }

    async fn create_session(&self, _chain_id: u64) -> Result<SessionApproval> {
        if let Some(shared) = self.shared.upgrade() {
            *shared.sessions_created.lock() += 1;
        }

        let approval = {
            let peer = self.peer.lock();
            if peer.reject {
                return Err(ConnectorError::BackendRejected("User rejected the session".to_string()));
            }
            SessionApproval {
                accounts: peer.accounts.clone(),
                chain_id: peer.chain_id,
            }
        };

        *self.approval.lock() = Some(approval.clone());
        if let Some(shared) = self.shared.upgrade() {
            shared
                .persisted
                .lock()
                .insert(self.storage_id.clone(), approval.clone());
        }
        Ok(approval)
    }

    async fn kill_session(&self) -> Result<()> {
        self.forget();
        self.drop_session(None);
        Ok(())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String> {
        self.require_connected()?;
        Ok(format!("0x{:064x}", tx.to.len() + tx.from.len()))
    }

    async fn sign_personal_message(&self, params: [String; 2]) -> Result<String> {
        self.require_connected()?;
        Ok(format!("0x{:0130x}", params[0].len()))
    }

    fn on_disconnect(&self, listener: PairingListener) {
        self.listeners.lock().push(listener);
    }
}

// endregion: --- Pairing SDK
