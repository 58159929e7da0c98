//! # Wallet Registry
//!
//! Owns the backend boundaries and hands out one adapter per instance name.
//! Widgets that share a registry share handles; separate registries are
//! fully independent.

use crate::backend::{BackendKind, Eip1193Provider, PairingClient};
use crate::injected::InjectedWallet;
use crate::remote::RemoteWallet;
use crate::wallet::WalletHandle;
use lib_core::{ConnectorConfig, ConnectorError, Result};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

pub const MISSING_PROVIDER_MESSAGE: &str = "Metamask wallet wasn't installed";

/// Registry of wallet adapters.
pub struct WalletRegistry {
    provider: Option<Arc<dyn Eip1193Provider>>,
    pairing: Arc<dyn PairingClient>,
    injected: Mutex<HashMap<String, Arc<InjectedWallet>>>,
    remote: Mutex<HashMap<String, Arc<RemoteWallet>>>,
}

impl WalletRegistry {
    /// `provider` is `None` when the page has no injected wallet.
    pub fn new(provider: Option<Arc<dyn Eip1193Provider>>, pairing: Arc<dyn PairingClient>) -> Self {
        Self {
            provider,
            pairing,
            injected: Mutex::new(HashMap::new()),
            remote: Mutex::new(HashMap::new()),
        }
    }

    pub fn has_injected_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Injected adapter for `instance`, created on first use.
    pub fn injected(&self, instance: &str) -> Result<Arc<InjectedWallet>> {
        let provider = self
            .provider
            .as_ref()
            .ok_or_else(|| ConnectorError::BackendUnavailable(MISSING_PROVIDER_MESSAGE.to_string()))?;

        let mut injected = self.injected.lock();
        let wallet = injected.entry(instance.to_string()).or_insert_with(|| {
            debug!(instance, "creating injected wallet");
            Arc::new(InjectedWallet::new(instance, Arc::clone(provider)))
        });
        Ok(Arc::clone(wallet))
    }

    /// Remote adapter for `instance` on `chain_id`, created on first use.
    pub fn remote(&self, instance: &str, chain_id: u64) -> Arc<RemoteWallet> {
        let key = format!("{}-{}", instance, chain_id);
        let mut remote = self.remote.lock();
        let wallet = remote.entry(key).or_insert_with_key(|key| {
            debug!(instance = %key, "creating remote wallet");
            Arc::new(RemoteWallet::new(key.clone(), Arc::clone(&self.pairing)))
        });
        Arc::clone(wallet)
    }

    /// Handle for `kind`, named after the configured instances.
    pub fn handle(&self, kind: BackendKind, chain_id: u64, config: &ConnectorConfig) -> Result<WalletHandle> {
        match kind {
            BackendKind::Injected => self.injected(&config.injected_instance).map(WalletHandle::Injected),
            BackendKind::Remote => Ok(WalletHandle::Remote(self.remote(&config.remote_instance, chain_id))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockEthereum, MockPairing};

    fn registry(with_provider: bool) -> WalletRegistry {
        let provider: Option<Arc<dyn Eip1193Provider>> =
            with_provider.then(|| Arc::new(MockEthereum::new(vec![], 56)) as Arc<dyn Eip1193Provider>);
        WalletRegistry::new(provider, Arc::new(MockPairing::new(vec![], 56)))
    }

    #[test]
    fn test_injected_singleton_per_instance() {
        let registry = registry(true);
        let a = registry.injected("metamask").unwrap();
        let b = registry.injected("metamask").unwrap();
        let c = registry.injected("other").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_remote_singleton_per_chain() {
        let registry = registry(true);
        let bsc = registry.remote("wallet-connect", 56);
        assert_eq!(bsc.instance(), "wallet-connect-56");
        assert!(Arc::ptr_eq(&bsc, &registry.remote("wallet-connect", 56)));
        assert!(!Arc::ptr_eq(&bsc, &registry.remote("wallet-connect", 137)));
    }

    #[test]
    fn test_missing_provider() {
        let registry = registry(false);
        assert!(!registry.has_injected_provider());
        let err = registry
            .handle(BackendKind::Injected, 56, &ConnectorConfig::default())
            .unwrap_err();
        assert_eq!(err.title(), "Metamask Not Found");
        assert_eq!(err.to_string(), MISSING_PROVIDER_MESSAGE);
    }

    #[test]
    fn test_handle_kinds() {
        let registry = registry(true);
        let config = ConnectorConfig::default();
        let injected = registry.handle(BackendKind::Injected, 56, &config).unwrap();
        let remote = registry.handle(BackendKind::Remote, 137, &config).unwrap();
        assert_eq!(injected.kind(), BackendKind::Injected);
        assert_eq!(remote.kind(), BackendKind::Remote);
        assert_eq!(remote.key(), "walletconnect:wallet-connect-137");
        assert!(injected.same_as(&registry.handle(BackendKind::Injected, 4002, &config).unwrap()));
    }
}
