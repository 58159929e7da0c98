//! Connector state shared between widgets

use leptos::prelude::*;
use lib_core::ConnectorConfig;
use lib_wallet::backend::Eip1193Provider;
use lib_wallet::mock::{MockEthereum, MockPairing};
use lib_wallet::{
    connected_wallet, KeyValueStorage, MemoryStorage, SessionStore, UiState, WalletConnector, WalletHandle,
    WalletRegistry,
};
use std::sync::Arc;

use crate::services::{BrowserEthereum, BrowserPairing, LocalStorage};

/// Account the mock backends hand out.
pub const MOCK_ACCOUNT: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

/// Backends and storage every widget below the provider shares
#[derive(Clone, Copy)]
pub struct ConnectorContext {
    registry: StoredValue<Arc<WalletRegistry>>,
    storage: StoredValue<Arc<dyn KeyValueStorage>>,
}

impl ConnectorContext {
    pub fn new(registry: Arc<WalletRegistry>, storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            registry: StoredValue::new(registry),
            storage: StoredValue::new(storage),
        }
    }

    /// `window.ethereum`, the WalletConnect client and `localStorage`.
    pub fn browser(pairing_bridge: &str) -> Self {
        let provider = BrowserEthereum::detect().map(|p| Arc::new(p) as Arc<dyn Eip1193Provider>);
        let registry = WalletRegistry::new(provider, Arc::new(BrowserPairing::new(pairing_bridge)));
        Self::new(Arc::new(registry), Arc::new(LocalStorage))
    }

    /// Deterministic in-memory backends on `chain_id`.
    pub fn mock(chain_id: u64) -> Self {
        let ethereum = MockEthereum::new(vec![MOCK_ACCOUNT.to_lowercase()], chain_id);
        let pairing = MockPairing::new(vec![MOCK_ACCOUNT.to_string()], chain_id);
        let registry = WalletRegistry::new(Some(Arc::new(ethereum)), Arc::new(pairing));
        Self::new(Arc::new(registry), Arc::new(MemoryStorage::new()))
    }

    pub fn registry(&self) -> Arc<WalletRegistry> {
        self.registry.get_value()
    }

    pub fn store(&self, namespace: &str) -> SessionStore {
        SessionStore::new(self.storage.get_value(), namespace)
    }

    /// Wallet recorded by the last successful connect, if its backend is still there
    pub fn connected_wallet(&self, config: &ConnectorConfig) -> Option<WalletHandle> {
        let store = self.store(&config.storage_namespace);
        connected_wallet(&self.registry(), &store, config)
    }
}

pub fn provide_connector_context(context: ConnectorContext) -> ConnectorContext {
    provide_context(context);
    context
}

pub fn use_connector_context() -> ConnectorContext {
    expect_context::<ConnectorContext>()
}

/// Imperative control over one mounted widget.
#[derive(Clone, Copy)]
pub struct ConnectorHandle {
    connector: StoredValue<Option<WalletConnector>>,
}

impl Default for ConnectorHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorHandle {
    pub fn new() -> Self {
        Self {
            connector: StoredValue::new(None),
        }
    }

    pub(crate) fn attach(&self, connector: WalletConnector) {
        self.connector.set_value(Some(connector));
    }

    fn current(&self) -> Option<WalletConnector> {
        self.connector.try_get_value().flatten()
    }

    /// Same as pressing the connect button.
    pub fn connect(&self) {
        if let Some(connector) = self.current() {
            connector.connect();
        }
    }

    pub fn disconnect(&self) {
        if let Some(connector) = self.current() {
            leptos::task::spawn_local(async move {
                connector.disconnect().await;
            });
        }
    }

    pub fn wallet(&self) -> Option<WalletHandle> {
        self.current()?.wallet()
    }

    pub fn state(&self) -> Option<UiState> {
        self.current().map(|connector| connector.state())
    }
}

/// Widget properties folded into one configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WidgetOptions {
    pub config_json: Option<String>,
    pub chain_id: Option<u64>,
    pub dialog_title: Option<String>,
    pub ignore_chain_mismatch: bool,
    pub hide_disconnect_button: bool,
    pub invisible: bool,
}

impl WidgetOptions {
    /// Start from the JSON blob (or defaults), then let explicit props win.
    /// Boolean props can only switch a flag on.
    pub fn resolve(&self) -> ConnectorConfig {
        let mut config = match self.config_json.as_deref() {
            Some(raw) => ConnectorConfig::from_json(raw).unwrap_or_else(|e| {
                log::warn!("Ignoring widget config: {}", e);
                ConnectorConfig::default()
            }),
            None => ConnectorConfig::default(),
        };

        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
        if let Some(title) = &self.dialog_title {
            config.dialog_title = title.clone();
        }
        config.ignore_chain_mismatch |= self.ignore_chain_mismatch;
        config.hide_disconnect_button |= self.hide_disconnect_button;
        config.invisible |= self.invisible;

        if let Err(e) = config.validate() {
            log::warn!("Widget config is invalid: {}", e);
        }
        config
    }
}
