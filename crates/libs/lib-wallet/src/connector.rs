//! # Wallet Connector
//!
//! [`WalletConnector`] is the orchestrator behind one widget. It owns the
//! [`UiState`], runs the connect flow against the adapter the user picked,
//! persists the session, restores it silently on mount and reports every
//! outcome to its [`ConnectorHost`].
//!
//! ## Flow
//!
//! ```text
//! connect() ──▶ dialog ──select_backend()──▶ Wallet::connect ──▶ SessionStore::save
//!                                                      │                │
//!                                                      ▼                ▼
//!                                               error modal     host.on_connect
//! ```
//!
//! Every connect attempt carries a token. Dismissing the dialog, disconnecting
//! or starting a newer attempt invalidates older tokens, and a result arriving
//! with a stale token is dropped.

use crate::backend::BackendKind;
use crate::dialog::DialogChoice;
use crate::network;
use crate::registry::WalletRegistry;
use crate::session::SessionStore;
use crate::state::{reduce, ModalKind, Phase, Transition, UiState};
use crate::wallet::WalletHandle;
use lib_core::{ConnectorConfig, ConnectorError, Result};
use lib_utils::same_address;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

// region:    --- Host

/// Notifications a hosting application receives.
///
/// All methods default to no-ops.
pub trait ConnectorHost: Send + Sync {
    /// A wallet connected (or was restored). `error` is `None` on success.
    fn on_connect(&self, _error: Option<&ConnectorError>, _wallet: &WalletHandle) {}

    fn on_disconnect(&self, _error: Option<&ConnectorError>) {}

    /// The active injected account changed.
    fn on_change(&self, _address: &str) {}

    /// The injected wallet moved to another chain; account and chain context
    /// are entangled for that backend, so the host should start over
    /// (a browser host reloads the page).
    fn on_hard_reset(&self) {}
}

type ConnectFn = Box<dyn Fn(Option<&ConnectorError>, &WalletHandle) + Send + Sync>;
type DisconnectFn = Box<dyn Fn(Option<&ConnectorError>) + Send + Sync>;
type ChangeFn = Box<dyn Fn(&str) + Send + Sync>;
type ResetFn = Box<dyn Fn() + Send + Sync>;

/// [`ConnectorHost`] assembled from closures.
#[derive(Default)]
pub struct CallbackHost {
    on_connect: Option<ConnectFn>,
    on_disconnect: Option<DisconnectFn>,
    on_change: Option<ChangeFn>,
    on_hard_reset: Option<ResetFn>,
}

impl CallbackHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_connect(mut self, f: impl Fn(Option<&ConnectorError>, &WalletHandle) + Send + Sync + 'static) -> Self {
        self.on_connect = Some(Box::new(f));
        self
    }

    pub fn on_disconnect(mut self, f: impl Fn(Option<&ConnectorError>) + Send + Sync + 'static) -> Self {
        self.on_disconnect = Some(Box::new(f));
        self
    }

    pub fn on_change(mut self, f: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub fn on_hard_reset(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_hard_reset = Some(Box::new(f));
        self
    }
}

impl ConnectorHost for CallbackHost {
    fn on_connect(&self, error: Option<&ConnectorError>, wallet: &WalletHandle) {
        if let Some(f) = &self.on_connect {
            f(error, wallet);
        }
    }

    fn on_disconnect(&self, error: Option<&ConnectorError>) {
        if let Some(f) = &self.on_disconnect {
            f(error);
        }
    }

    fn on_change(&self, address: &str) {
        if let Some(f) = &self.on_change {
            f(address);
        }
    }

    fn on_hard_reset(&self) {
        if let Some(f) = &self.on_hard_reset {
            f();
        }
    }
}

// endregion: --- Host

/// Listener for UI re-rendering.
pub type StateListener = Arc<dyn Fn(&UiState) + Send + Sync>;

struct Inner {
    config: ConnectorConfig,
    registry: Arc<WalletRegistry>,
    store: SessionStore,
    host: Arc<dyn ConnectorHost>,
    state: Mutex<UiState>,
    listeners: Mutex<Vec<StateListener>>,
    active: Mutex<Option<WalletHandle>>,
    /// Handles that already carry our disconnect listener.
    watched: Mutex<HashSet<String>>,
    attempt: AtomicU64,
    mounted: AtomicBool,
}

/// Orchestrator for one widget. Cloning yields another handle to the same widget.
#[derive(Clone)]
pub struct WalletConnector {
    inner: Arc<Inner>,
}

impl WalletConnector {
    pub fn new(
        config: ConnectorConfig,
        registry: Arc<WalletRegistry>,
        store: SessionStore,
        host: Arc<dyn ConnectorHost>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                registry,
                store,
                host,
                state: Mutex::new(UiState::default()),
                listeners: Mutex::new(Vec::new()),
                active: Mutex::new(None),
                watched: Mutex::new(HashSet::new()),
                attempt: AtomicU64::new(0),
                mounted: AtomicBool::new(false),
            }),
        }
    }

    fn weak(&self) -> Weak<Inner> {
        Arc::downgrade(&self.inner)
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.inner.config
    }

    pub fn state(&self) -> UiState {
        self.inner.state.lock().clone()
    }

    /// Call `listener` after every state change.
    pub fn subscribe(&self, listener: StateListener) {
        self.inner.listeners.lock().push(listener);
    }

    /// The connected wallet, if any.
    pub fn wallet(&self) -> Option<WalletHandle> {
        if !self.state().connected {
            return None;
        }
        self.inner.active.lock().clone()
    }

    // region:    --- Lifecycle

    /// Subscribe to injected-provider events and restore the previous session.
    /// Only the first call has an effect.
    pub async fn mount(&self) {
        if self.inner.mounted.swap(true, Ordering::SeqCst) {
            return;
        }
        self.watch_injected_events();
        self.restore().await;
    }

    /// Button or host-driven connect: open the dialog, or report an
    /// unsupported target chain right away.
    pub fn connect(&self) {
        let chain_id = self.inner.config.chain_id;
        if chain_id == 0 {
            warn!("connect requested without a target chain");
            self.show_error(&ConnectorError::InvalidChainId);
            return;
        }
        if !network::is_supported(chain_id) {
            warn!(chain_id, "connect requested for unsupported network");
            self.show_error(&ConnectorError::UnsupportedNetwork(chain_id));
            return;
        }
        if self.state().phase == Phase::Connecting {
            debug!("connect already in flight, ignoring");
            return;
        }
        self.dispatch(Transition::OpenDialog);
    }

    /// The dialog closed with `choice`.
    pub async fn select_backend(&self, choice: DialogChoice) {
        match choice {
            DialogChoice::Dismissed => {
                self.next_attempt();
                self.dispatch(Transition::CloseDialog);
            }
            DialogChoice::Backend(kind) => {
                if self.state().phase == Phase::Connecting {
                    debug!(backend = %kind, "connect already in flight, ignoring selection");
                    return;
                }
                self.connect_with(kind, self.inner.config.chain_id).await;
            }
        }
    }

    /// Disconnect the active wallet and forget the session. No-op when not connected.
    pub async fn disconnect(&self) {
        if !self.state().connected {
            return;
        }
        self.next_attempt();

        let active = self.inner.active.lock().take();
        if let Some(wallet) = active {
            if let Err(err) = wallet.disconnect().await {
                warn!(error = %err, backend = %wallet.kind(), "backend disconnect failed");
            }
        }

        info!("wallet disconnected");
        self.inner.store.clear();
        self.dispatch(Transition::Disconnected);
        self.inner.host.on_disconnect(None);
    }

    pub fn close_modal(&self) {
        self.dispatch(Transition::CloseModal);
    }

    // endregion: --- Lifecycle

    // region:    --- Connect flow

    fn next_attempt(&self) -> u64 {
        self.inner.attempt.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, attempt: u64) -> bool {
        self.inner.attempt.load(Ordering::SeqCst) == attempt
    }

    async fn connect_with(&self, kind: BackendKind, chain_id: u64) {
        let attempt = self.next_attempt();
        self.dispatch(Transition::BeginConnect { kind });

        let result = self.try_connect(kind, chain_id).await;
        if !self.is_current(attempt) {
            debug!(attempt, backend = %kind, "discarding stale connect result");
            return;
        }

        match result {
            Ok((wallet, address)) => {
                info!(backend = %kind, chain_id, %address, "wallet connected");
                self.finish_connect(wallet, address, chain_id);
            }
            Err(err) => {
                warn!(backend = %kind, chain_id, error = %err, "wallet connect failed");
                self.show_error(&err);
            }
        }
    }

    async fn try_connect(&self, kind: BackendKind, chain_id: u64) -> Result<(WalletHandle, String)> {
        let wallet = self.inner.registry.handle(kind, chain_id, &self.inner.config)?;
        let address = wallet
            .connect(chain_id, self.inner.config.ignore_chain_mismatch)
            .await?;
        Ok((wallet, address))
    }

    fn finish_connect(&self, wallet: WalletHandle, address: String, chain_id: u64) {
        let kind = wallet.kind();
        // The record keeps the target chain, it names the remote instance to reopen
        self.inner.store.save(kind, chain_id);
        *self.inner.active.lock() = Some(wallet.clone());
        let wallet_chain = match wallet.snapshot().chain_id {
            0 => chain_id,
            actual => actual,
        };
        self.dispatch(Transition::Connected {
            kind,
            address,
            chain_id: wallet_chain,
        });
        self.watch_disconnect(&wallet);
        self.inner.host.on_connect(None, &wallet);
    }

    /// Silent restoration from the session record.
    async fn restore(&self) {
        let Some(record) = self.inner.store.read() else {
            return;
        };

        let wallet = match self
            .inner
            .registry
            .handle(record.kind, record.chain_id, &self.inner.config)
        {
            Ok(wallet) => wallet,
            Err(err) => {
                warn!(backend = %record.kind, error = %err, "cannot restore session, clearing it");
                self.inner.store.clear();
                return;
            }
        };

        // Warms the address cache so an authorised backend reports connected
        let attempt = self.next_attempt();
        if let Err(err) = wallet.get_address().await {
            warn!(backend = %record.kind, error = %err, "address lookup failed during restore");
        }
        if !self.is_current(attempt) {
            debug!(attempt, "discarding stale restore");
            return;
        }

        if wallet.is_connected() {
            info!(backend = %record.kind, chain_id = record.chain_id, "restoring session, verifying chain");
        } else {
            info!(backend = %record.kind, chain_id = record.chain_id, "session expired, reconnecting");
        }
        // Both paths re-run the chain check so a wallet moved to another
        // network while the page was closed is switched back or reported.
        self.connect_with(record.kind, record.chain_id).await;
    }

    fn show_error(&self, err: &ConnectorError) {
        self.dispatch(Transition::OpenModal {
            kind: ModalKind::Error,
            title: err.title().to_string(),
            message: err.to_string(),
        });
    }

    // endregion: --- Connect flow

    // region:    --- Backend events

    fn watch_disconnect(&self, wallet: &WalletHandle) {
        let key = wallet.key();
        if !self.inner.watched.lock().insert(key.clone()) {
            return;
        }

        let weak = self.weak();
        wallet.on_disconnect(Arc::new(move |error| {
            if let Some(connector) = Self::upgrade(&weak) {
                connector.handle_external_disconnect(&key, error.as_ref());
            }
        }));
    }

    fn handle_external_disconnect(&self, key: &str, error: Option<&ConnectorError>) {
        let is_active = self
            .inner
            .active
            .lock()
            .as_ref()
            .is_some_and(|wallet| wallet.key() == key);
        if !is_active || !self.state().connected {
            debug!(key, "disconnect event for an inactive wallet");
            return;
        }

        info!(key, ?error, "wallet disconnected by backend");
        self.inner.active.lock().take();
        self.inner.store.clear();
        self.dispatch(Transition::Disconnected);
        self.inner.host.on_disconnect(error);
    }

    fn watch_injected_events(&self) {
        let wallet = match self.inner.registry.injected(&self.inner.config.injected_instance) {
            Ok(wallet) => wallet,
            Err(_) => {
                debug!("no injected provider, skipping event subscription");
                return;
            }
        };

        let weak = self.weak();
        wallet.on_accounts_changed(Arc::new(move |accounts| {
            if let Some(connector) = Self::upgrade(&weak) {
                connector.handle_accounts_changed(accounts);
            }
        }));

        let weak = self.weak();
        wallet.on_chain_changed(Arc::new(move |chain_id| {
            if let Some(connector) = Self::upgrade(&weak) {
                connector.handle_chain_changed(chain_id);
            }
        }));
    }

    fn handle_accounts_changed(&self, accounts: Vec<String>) {
        let Some(address) = accounts.into_iter().next() else {
            return;
        };
        let state = self.state();
        if !state.connected
            || state.backend_kind != Some(BackendKind::Injected)
            || same_address(&state.address, &address)
        {
            return;
        }

        info!(%address, "injected account changed");
        self.dispatch(Transition::AccountChanged {
            kind: BackendKind::Injected,
            address: address.clone(),
        });
        self.inner.host.on_change(&address);
    }

    fn handle_chain_changed(&self, chain_id: u64) {
        let state = self.state();
        if !state.connected || state.backend_kind != Some(BackendKind::Injected) {
            debug!(chain_id, "chain changed while injected wallet inactive");
            return;
        }

        info!(from = state.chain_id, to = chain_id, "injected chain changed, requesting hard reset");
        self.next_attempt();
        self.inner.active.lock().take();
        self.dispatch(Transition::Reset);
        self.inner.host.on_hard_reset();
    }

    // endregion: --- Backend events

    fn dispatch(&self, transition: Transition) {
        let next = {
            let mut state = self.inner.state.lock();
            let next = reduce(&state, &transition);
            *state = next.clone();
            next
        };
        debug!(?transition, phase = ?next.phase, "state transition");

        let listeners = self.inner.listeners.lock().clone();
        for listener in listeners {
            listener(&next);
        }
    }
}

/// The previously used wallet, resolved from the session record without a
/// mounted widget. `None` when no session is recorded or its backend is gone.
pub fn connected_wallet(
    registry: &WalletRegistry,
    store: &SessionStore,
    config: &ConnectorConfig,
) -> Option<WalletHandle> {
    let record = store.read()?;
    registry.handle(record.kind, record.chain_id, config).ok()
}
