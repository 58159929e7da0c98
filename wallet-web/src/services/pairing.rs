//! WalletConnect v1 client binding.
//!
//! The page loads the WalletConnect client and QR code modal UMD bundles, which
//! expose `window.WalletConnect` and `window.WalletConnectQRCodeModal`. Each
//! connector object lives in a JS-side table and Rust only keeps its slot id.

use async_trait::async_trait;
use lib_core::ConnectorError;
use lib_wallet::backend::{PairingClient, PairingListener, PairingSession, SessionApproval};
use serde::Serialize;
use shared::dto::TransactionRequest;
use std::sync::Arc;
use wasm_bindgen::prelude::*;

const MISSING_CLIENT_MESSAGE: &str = "WalletConnect client wasn't loaded";

// ============================================================================
// JAVASCRIPT INTEROP
// ============================================================================

#[wasm_bindgen(inline_js = "
const connectors = new Map();
let nextSlot = 1;

function unwrap(module) {
    return module && module.default ? module.default : module;
}

function entry(slot) {
    const found = connectors.get(slot);
    if (!found) {
        throw new Error('Unknown WalletConnect session');
    }
    return found;
}

function message(e) {
    return e && e.message ? String(e.message) : String(e);
}

export function pairingOpen(storageId, bridge) {
    const Client = unwrap(window.WalletConnect);
    if (typeof Client !== 'function') {
        return 0;
    }
    const connector = new Client({
        bridge,
        qrcodeModal: unwrap(window.WalletConnectQRCodeModal),
        storageId,
    });
    const slot = nextSlot++;
    const record = { connector, pending: null };
    connector.on('connect', (error, payload) => {
        const pending = record.pending;
        record.pending = null;
        if (!pending) {
            return;
        }
        if (error) {
            pending.reject(message(error));
            return;
        }
        const params = payload && payload.params ? payload.params[0] : {};
        pending.resolve({ accounts: params.accounts || [], chainId: Number(params.chainId || 0) });
    });
    connectors.set(slot, record);
    return slot;
}

export function pairingConnected(slot) {
    const found = connectors.get(slot);
    return !!found && !!found.connector.connected;
}

export function pairingAccounts(slot) {
    const found = connectors.get(slot);
    return found && found.connector.accounts ? found.connector.accounts.slice() : [];
}

export function pairingChainId(slot) {
    const found = connectors.get(slot);
    return found ? Number(found.connector.chainId || 0) : 0;
}

export function pairingCreateSession(slot, chainId) {
    const record = entry(slot);
    return new Promise((resolve, reject) => {
        record.pending = { resolve, reject };
        record.connector.createSession({ chainId }).catch((e) => {
            record.pending = null;
            reject(message(e));
        });
    });
}

export async function pairingKillSession(slot) {
    try {
        await entry(slot).connector.killSession();
    } catch (e) {
        throw message(e);
    }
}

export async function pairingSendTransaction(slot, tx) {
    try {
        return await entry(slot).connector.sendTransaction(tx);
    } catch (e) {
        throw message(e);
    }
}

export async function pairingSignPersonalMessage(slot, params) {
    try {
        return await entry(slot).connector.signPersonalMessage(params);
    } catch (e) {
        throw message(e);
    }
}

export function pairingOnDisconnect(slot, callback) {
    const found = connectors.get(slot);
    if (found) {
        found.connector.on('disconnect', (error) => callback(error ? message(error) : null));
    }
}
")]
extern "C" {
    /// New connector restoring whatever is stored under `storageId`; `0` when the client is missing
    fn pairingOpen(storage_id: &str, bridge: &str) -> u32;

    fn pairingConnected(slot: u32) -> bool;

    fn pairingAccounts(slot: u32) -> JsValue;

    fn pairingChainId(slot: u32) -> f64;

    /// Resolves with `{ accounts, chainId }` once the peer answers
    #[wasm_bindgen(catch)]
    async fn pairingCreateSession(slot: u32, chain_id: f64) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn pairingKillSession(slot: u32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn pairingSendTransaction(slot: u32, tx: JsValue) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn pairingSignPersonalMessage(slot: u32, params: JsValue) -> Result<JsValue, JsValue>;

    fn pairingOnDisconnect(slot: u32, callback: &Closure<dyn FnMut(JsValue)>);
}

// ============================================================================
// CLIENT AND SESSIONS
// ============================================================================

/// [`PairingClient`] over the WalletConnect v1 browser client.
#[derive(Debug, Clone)]
pub struct BrowserPairing {
    bridge: String,
}

impl BrowserPairing {
    pub fn new(bridge: impl Into<String>) -> Self {
        Self { bridge: bridge.into() }
    }
}

impl PairingClient for BrowserPairing {
    fn open(&self, storage_id: &str) -> Arc<dyn PairingSession> {
        let slot = pairingOpen(storage_id, &self.bridge);
        if slot == 0 {
            log::warn!("WalletConnect client missing, session {} is inert", storage_id);
        }
        Arc::new(BrowserSession { slot })
    }
}

/// One WalletConnect connector object.
#[derive(Debug)]
struct BrowserSession {
    slot: u32,
}

impl BrowserSession {
    fn ensure_client(&self) -> lib_core::Result<()> {
        if self.slot == 0 {
            return Err(ConnectorError::BackendUnavailable(MISSING_CLIENT_MESSAGE.to_string()));
        }
        Ok(())
    }
}

fn js_message(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| "Unknown WalletConnect error".to_string())
}

/// The client reports user rejection with this message.
fn pairing_error(err: JsValue) -> ConnectorError {
    let message = js_message(&err);
    if message.to_lowercase().contains("rejected") {
        ConnectorError::BackendRejected(message)
    } else {
        ConnectorError::TransportFailure(message)
    }
}

fn to_js<T: Serialize>(value: &T) -> lib_core::Result<JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| ConnectorError::Decoding(e.to_string()))
}

fn string_result(value: JsValue) -> lib_core::Result<String> {
    value
        .as_string()
        .ok_or_else(|| ConnectorError::Decoding("WalletConnect returned a non-string result".to_string()))
}

#[async_trait(?Send)]
impl PairingSession for BrowserSession {
    fn is_connected(&self) -> bool {
        self.slot != 0 && pairingConnected(self.slot)
    }

    fn accounts(&self) -> Vec<String> {
        if self.slot == 0 {
            return Vec::new();
        }
        serde_wasm_bindgen::from_value(pairingAccounts(self.slot)).unwrap_or_default()
    }

    fn chain_id(&self) -> u64 {
        if self.slot == 0 {
            return 0;
        }
        pairingChainId(self.slot) as u64
    }

    async fn create_session(&self, chain_id: u64) -> lib_core::Result<SessionApproval> {
        self.ensure_client()?;
        let approval = pairingCreateSession(self.slot, chain_id as f64)
            .await
            .map_err(pairing_error)?;
        serde_wasm_bindgen::from_value(approval).map_err(|e| ConnectorError::Decoding(e.to_string()))
    }

    async fn kill_session(&self) -> lib_core::Result<()> {
        self.ensure_client()?;
        pairingKillSession(self.slot).await.map_err(pairing_error)?;
        Ok(())
    }

    async fn send_transaction(&self, tx: &TransactionRequest) -> lib_core::Result<String> {
        self.ensure_client()?;
        let tx = to_js(tx)?;
        let hash = pairingSendTransaction(self.slot, tx).await.map_err(pairing_error)?;
        string_result(hash)
    }

    async fn sign_personal_message(&self, params: [String; 2]) -> lib_core::Result<String> {
        self.ensure_client()?;
        let params = to_js(&params)?;
        let signature = pairingSignPersonalMessage(self.slot, params)
            .await
            .map_err(pairing_error)?;
        string_result(signature)
    }

    fn on_disconnect(&self, listener: PairingListener) {
        if self.slot == 0 {
            return;
        }
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |error: JsValue| {
            listener(error.as_string());
        });
        pairingOnDisconnect(self.slot, &callback);
        callback.forget();
    }
}
