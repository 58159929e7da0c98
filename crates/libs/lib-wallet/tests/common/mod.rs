//! # Connector Test Harness
//!
//! Builds connectors over the deterministic backends and records every host
//! notification.

#![allow(dead_code)]

use async_trait::async_trait;
use lib_core::{ConnectorConfig, ConnectorError};
use lib_wallet::backend::{Eip1193Provider, ProviderError, ProviderEvent, ProviderListener, RpcMethod};
use lib_wallet::mock::{MockEthereum, MockPairing};
use lib_wallet::{CallbackHost, MemoryStorage, SessionStore, WalletConnector, WalletRegistry};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

pub const ACCOUNT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const OTHER_ACCOUNT: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

/// What the host saw.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    Connected(String),
    Disconnected(Option<ConnectorError>),
    Changed(String),
    HardReset,
}

/// Injected provider whose `eth_requestAccounts` can be held until released.
pub struct GatedEthereum {
    pub inner: Arc<MockEthereum>,
    closed: AtomicBool,
    gate: Notify,
}

impl GatedEthereum {
    pub fn new(inner: Arc<MockEthereum>) -> Self {
        Self {
            inner,
            closed: AtomicBool::new(false),
            gate: Notify::new(),
        }
    }

    pub fn hold(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.closed.store(false, Ordering::SeqCst);
        self.gate.notify_waiters();
    }
}

#[async_trait(?Send)]
impl Eip1193Provider for GatedEthereum {
    async fn request(&self, method: RpcMethod, params: Value) -> Result<Value, ProviderError> {
        if method == RpcMethod::RequestAccounts && self.closed.load(Ordering::SeqCst) {
            self.gate.notified().await;
        }
        self.inner.request(method, params).await
    }

    fn on(&self, event: ProviderEvent, listener: ProviderListener) {
        self.inner.on(event, listener);
    }
}

/// One simulated page: backends, storage and a shared registry.
pub struct Harness {
    pub ethereum: Arc<MockEthereum>,
    pub pairing: MockPairing,
    pub storage: Arc<MemoryStorage>,
    pub registry: Arc<WalletRegistry>,
    pub events: Arc<Mutex<Vec<HostEvent>>>,
}

impl Harness {
    /// Injected wallet on `injected_chain`, remote peer on `peer_chain`.
    pub fn new(injected_chain: u64, peer_chain: u64) -> Self {
        let ethereum = Arc::new(MockEthereum::new(vec![ACCOUNT.to_lowercase()], injected_chain));
        let pairing = MockPairing::new(vec![ACCOUNT.to_string()], peer_chain);
        let registry = Arc::new(WalletRegistry::new(
            Some(ethereum.clone() as Arc<dyn Eip1193Provider>),
            Arc::new(pairing.clone()),
        ));
        Self {
            ethereum,
            pairing,
            storage: Arc::new(MemoryStorage::new()),
            registry,
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A page without an injected provider.
    pub fn without_provider(peer_chain: u64) -> Self {
        let mut harness = Self::new(56, peer_chain);
        harness.registry = Arc::new(WalletRegistry::new(None, Arc::new(harness.pairing.clone())));
        harness
    }

    /// Same backends and storage behind a fresh registry, as after a page reload.
    pub fn reload(&self) -> Self {
        Self {
            ethereum: self.ethereum.clone(),
            pairing: self.pairing.clone(),
            storage: self.storage.clone(),
            registry: Arc::new(WalletRegistry::new(
                Some(self.ethereum.clone() as Arc<dyn Eip1193Provider>),
                Arc::new(self.pairing.clone()),
            )),
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn store(&self) -> SessionStore {
        SessionStore::new(self.storage.clone(), "wallet-connector")
    }

    pub fn connector(&self, config: ConnectorConfig) -> WalletConnector {
        let connected = self.events.clone();
        let disconnected = self.events.clone();
        let changed = self.events.clone();
        let reset = self.events.clone();
        let host = CallbackHost::new()
            .on_connect(move |_, wallet| connected.lock().push(HostEvent::Connected(wallet.key())))
            .on_disconnect(move |error| disconnected.lock().push(HostEvent::Disconnected(error.cloned())))
            .on_change(move |address| changed.lock().push(HostEvent::Changed(address.to_string())))
            .on_hard_reset(move || reset.lock().push(HostEvent::HardReset));

        WalletConnector::new(config, self.registry.clone(), self.store(), Arc::new(host))
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().clone()
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        use lib_wallet::KeyValueStorage;
        self.storage.get(key)
    }

    pub fn count_calls(&self, method: RpcMethod) -> usize {
        self.ethereum.calls().iter().filter(|m| **m == method).count()
    }
}
