//! Injected EVM provider (`window.ethereum`) via wasm-bindgen.

use async_trait::async_trait;
use lib_wallet::backend::{Eip1193Provider, ProviderError, ProviderEvent, ProviderListener, RpcMethod};
use lib_wallet::backend::eip1193::INTERNAL_ERROR;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

// ============================================================================
// JAVASCRIPT INTEROP
// ============================================================================

#[wasm_bindgen(inline_js = "
function provider() {
    return typeof window !== 'undefined' ? window.ethereum : undefined;
}

export function hasEthereum() {
    const ethereum = provider();
    return !!ethereum && typeof ethereum.request === 'function';
}

export async function ethereumRequest(method, params) {
    const ethereum = provider();
    if (!ethereum) {
        throw { code: -32603, message: 'Injected provider is gone' };
    }
    try {
        const args = params === null || params === undefined ? { method } : { method, params };
        return await ethereum.request(args);
    } catch (e) {
        // Providers throw plain objects, Error instances or strings
        const code = e && typeof e.code === 'number' ? e.code : 0;
        const message = e && e.message ? String(e.message) : String(e);
        throw { code, message };
    }
}

export function ethereumOn(event, callback) {
    const ethereum = provider();
    if (ethereum && typeof ethereum.on === 'function') {
        ethereum.on(event, callback);
    }
}
")]
extern "C" {
    /// Whether the page has an EIP-1193 provider
    fn hasEthereum() -> bool;

    /// Send one JSON-RPC request, rejects with `{ code, message }`
    #[wasm_bindgen(catch)]
    async fn ethereumRequest(method: &str, params: JsValue) -> Result<JsValue, JsValue>;

    /// Subscribe to a provider event
    fn ethereumOn(event: &str, callback: &Closure<dyn FnMut(JsValue)>);
}

// ============================================================================
// PROVIDER
// ============================================================================

/// [`Eip1193Provider`] over `window.ethereum`.
///
/// Holds no JS handle: the provider object is looked up on every call, so the
/// type stays `Send + Sync`.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserEthereum;

impl BrowserEthereum {
    /// `None` when the page has no injected wallet.
    pub fn detect() -> Option<Self> {
        if hasEthereum() {
            Some(Self)
        } else {
            log::info!("No injected EVM provider on this page");
            None
        }
    }
}

fn to_js(value: &Value) -> Result<JsValue, ProviderError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| ProviderError::new(INTERNAL_ERROR, format!("Cannot encode request: {}", e)))
}

fn from_js(value: JsValue) -> Value {
    if value.is_undefined() || value.is_null() {
        return Value::Null;
    }
    serde_wasm_bindgen::from_value(value).unwrap_or(Value::Null)
}

fn provider_error(err: JsValue) -> ProviderError {
    serde_wasm_bindgen::from_value::<ProviderError>(err.clone()).unwrap_or_else(|_| {
        ProviderError::new(0, err.as_string().unwrap_or_else(|| "Unknown provider error".to_string()))
    })
}

#[async_trait(?Send)]
impl Eip1193Provider for BrowserEthereum {
    async fn request(&self, method: RpcMethod, params: Value) -> Result<Value, ProviderError> {
        let params = to_js(&params)?;
        log::debug!("ethereum request {}", method.as_str());
        ethereumRequest(method.as_str(), params)
            .await
            .map(from_js)
            .map_err(provider_error)
    }

    fn on(&self, event: ProviderEvent, listener: ProviderListener) {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            listener(from_js(payload));
        });
        ethereumOn(event.as_str(), &callback);
        // The provider keeps the listener for the page lifetime
        callback.forget();
    }
}
