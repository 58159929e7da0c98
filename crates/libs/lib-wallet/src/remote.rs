//! # Remote Pairing Adapter
//!
//! [`RemoteWallet`] talks to a mobile wallet through a pairing SDK. The SDK
//! session object cannot be reused across chains, so every `connect` opens a
//! fresh one under the same storage id. The registry keeps one adapter per
//! `"{instance}-{chain}"`, which is also the storage id.

use crate::backend::{BackendKind, PairingClient, PairingSession};
use crate::network;
use crate::wallet::{normalize_account, DisconnectListener, Wallet, WalletSnapshot};
use async_trait::async_trait;
use lib_core::{ConnectorError, Result};
use lib_utils::is_address;
use parking_lot::Mutex;
use shared::dto::TransactionRequest;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct RemoteState {
    address: String,
    chain_id: u64,
    /// Bumped whenever the current session is replaced or released on purpose;
    /// disconnect events from older sessions are ignored.
    generation: u64,
}

pub struct RemoteWallet {
    instance: String,
    client: Arc<dyn PairingClient>,
    session: Mutex<Arc<dyn PairingSession>>,
    state: Arc<Mutex<RemoteState>>,
    listeners: Arc<Mutex<Vec<DisconnectListener>>>,
}

impl RemoteWallet {
    /// Open the adapter, restoring the session the SDK persisted under `instance`.
    pub fn new(instance: impl Into<String>, client: Arc<dyn PairingClient>) -> Self {
        let instance = instance.into();
        let session = client.open(&instance);
        let wallet = Self {
            instance,
            client,
            session: Mutex::new(Arc::clone(&session)),
            state: Arc::new(Mutex::new(RemoteState::default())),
            listeners: Arc::new(Mutex::new(Vec::new())),
        };
        wallet.attach(&session);

        if session.is_connected() {
            let mut state = wallet.state.lock();
            state.address = session
                .accounts()
                .first()
                .map(|a| normalize_account(a))
                .unwrap_or_default();
            state.chain_id = session.chain_id();
            debug!(instance = %wallet.instance, chain_id = state.chain_id, "restored pairing session");
        }
        wallet
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    fn current_session(&self) -> Arc<dyn PairingSession> {
        Arc::clone(&self.session.lock())
    }

    /// Route the session's disconnect event to the adapter's listeners.
    fn attach(&self, session: &Arc<dyn PairingSession>) {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.generation
        };
        let state = Arc::clone(&self.state);
        let listeners = Arc::clone(&self.listeners);
        let instance = self.instance.clone();

        session.on_disconnect(Arc::new(move |error| {
            {
                let mut state = state.lock();
                if state.generation != generation {
                    debug!(%instance, "ignoring disconnect from a replaced session");
                    return;
                }
                state.address.clear();
            }
            info!(%instance, ?error, "remote wallet disconnected");
            let error = error.map(ConnectorError::TransportFailure);
            let listeners = listeners.lock().clone();
            for listener in listeners {
                listener(error.clone());
            }
        }));
    }

    /// Make the current session's future disconnect events stale.
    fn release(&self) {
        self.state.lock().generation += 1;
    }
}

#[async_trait(?Send)]
impl Wallet for RemoteWallet {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn connect(&self, chain_id: u64, ignore_chain_mismatch: bool) -> Result<String> {
        if chain_id == 0 {
            return Err(ConnectorError::InvalidChainId);
        }
        if self.is_connected() {
            let current = self.chain_id().await?;
            if !ignore_chain_mismatch && current != 0 && current != chain_id {
                // The live session belongs to the user, it is left open
                return Err(network::chain_mismatch(chain_id, current));
            }
            return self.get_address().await;
        }

        let session = self.client.open(&self.instance);
        self.attach(&session);
        *self.session.lock() = Arc::clone(&session);

        info!(instance = %self.instance, chain_id, "waiting for remote wallet approval");
        let approval = session.create_session(chain_id).await?;

        if !ignore_chain_mismatch && approval.chain_id != chain_id {
            self.release();
            if let Err(err) = session.kill_session().await {
                warn!(error = %err, "failed to kill mismatched session");
            }
            return Err(network::chain_mismatch(chain_id, approval.chain_id));
        }

        let address = approval
            .accounts
            .first()
            .map(|a| normalize_account(a))
            .ok_or_else(|| ConnectorError::Decoding("remote wallet approved no accounts".to_string()))?;

        let mut state = self.state.lock();
        state.address = address.clone();
        state.chain_id = approval.chain_id;
        Ok(address)
    }

    async fn disconnect(&self) -> Result<()> {
        let session = self.current_session();
        self.release();
        self.state.lock().address.clear();
        if session.is_connected() {
            session.kill_session().await?;
        }
        Ok(())
    }

    async fn get_address(&self) -> Result<String> {
        let cached = self.state.lock().address.clone();
        if is_address(&cached) {
            return Ok(cached);
        }

        let session = self.current_session();
        match session.accounts().first() {
            Some(account) if session.is_connected() && is_address(account) => {
                let address = normalize_account(account);
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
        let chain_id = self.current_session().chain_id();
        self.state.lock().chain_id = chain_id;
        Ok(chain_id)
    }

    /// Pairing sessions cannot switch chains; reports success.
    async fn switch_network(&self, chain_id: u64) -> Result<bool> {
        debug!(chain_id, "switch_network is a no-op for remote wallets");
        Ok(true)
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> Result<String> {
        self.current_session().send_transaction(tx).await
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        let address = self.get_address().await?;
        self.current_session()
            .sign_personal_message([message.to_string(), address])
            .await
    }

    fn is_connected(&self) -> bool {
        is_address(&self.state.lock().address)
    }

    fn on_disconnect(&self, listener: DisconnectListener) {
        self.listeners.lock().push(listener);
    }

    fn snapshot(&self) -> WalletSnapshot {
        let state = self.state.lock();
        WalletSnapshot {
            kind: BackendKind::Remote,
            address: state.address.clone(),
            chain_id: state.chain_id,
            connected: is_address(&state.address),
        }
    }
}
