//! Wallet Connector Widget - Leptos Frontend
//!
//! `<WalletConnector/>` lets a page connect to an injected EVM wallet
//! (MetaMask) or a remote wallet over WalletConnect. Loading the module mounts
//! the demo [`app::App`].

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

pub mod app;
pub mod components;
pub mod services;
pub mod state;
pub mod utils;

pub use components::WalletConnector;
pub use state::{ConnectorContext, ConnectorHandle};

use app::App;

#[wasm_bindgen(start)]
pub fn main() {
    // Readable panics in the browser console
    console_error_panic_hook::set_once();

    // lib-wallet logs through tracing's log bridge, which lands here
    wasm_logger::init(wasm_logger::Config::new(log::Level::Debug));
    log::info!("Wallet connector starting");

    hide_loading_screen();
    leptos::mount::mount_to_body(|| view! { <App/> });
}

/// Hide the static loading placeholder of index.html
fn hide_loading_screen() {
    let Some(element) = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id("leptos-loading"))
    else {
        return;
    };

    if let Err(e) = element.class_list().add_1("hidden") {
        log::warn!("Could not hide loading screen: {:?}", e);
    }
}
