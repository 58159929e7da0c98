//! Demo page: three widgets on different networks sharing one registry.
//!
//! `?mock=1` swaps the browser wallets for deterministic in-memory backends.

use leptos::callback::Callback;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lib_core::config::DEFAULT_PAIRING_BRIDGE;
use lib_core::{ConnectorConfig, ConnectorError};
use lib_utils::to_checksum_address;
use lib_wallet::network;
use lib_wallet::WalletHandle;
use shared::truncate_address;

use crate::components::WalletConnector;
use crate::state::{provide_connector_context, use_connector_context, ConnectorContext, ConnectorHandle};
use crate::utils::url::query_flag;

const DEMO_CHAINS: [u64; 3] = [56, 137, 4002];

#[component]
pub fn App() -> impl IntoView {
    let context = if query_flag("mock") {
        log::info!("Using mock wallet backends");
        ConnectorContext::mock(DEMO_CHAINS[0])
    } else {
        ConnectorContext::browser(DEFAULT_PAIRING_BRIDGE)
    };
    provide_connector_context(context);

    view! {
        <div class="app-container">
            <header class="app-header">
                {DEMO_CHAINS.into_iter().map(|chain_id| view! { <ConnectorDemo chain_id=chain_id/> }).collect_view()}
            </header>
        </div>
    }
}

#[component]
fn ConnectorDemo(chain_id: u64) -> impl IntoView {
    let context = use_connector_context();
    let handle = ConnectorHandle::new();
    let address = RwSignal::new(None::<String>);
    let signature = RwSignal::new(None::<String>);
    let status = RwSignal::new(None::<String>);

    let on_connect = Callback::new(move |(error, wallet): (Option<ConnectorError>, WalletHandle)| match error {
        None => {
            let snapshot = wallet.snapshot();
            address.set(to_checksum_address(&snapshot.address).or(Some(snapshot.address)));
            status.set(None);
        }
        Some(error) => {
            address.set(None);
            status.set(Some(error.to_string()));
        }
    });
    let on_change = Callback::new(move |next: String| address.set(Some(next)));
    let on_disconnect = Callback::new(move |error: Option<ConnectorError>| {
        address.set(None);
        signature.set(None);
        status.set(error.map(|e| e.to_string()));
    });

    let sign = move |_| {
        let config = ConnectorConfig::for_chain(chain_id);
        let Some(wallet) = context.connected_wallet(&config) else {
            status.set(Some("No wallet connected".to_string()));
            return;
        };
        spawn_local(async move {
            match wallet.sign_message("Sign in to wallet connector demo").await {
                Ok(sig) => signature.set(Some(sig)),
                Err(e) => status.set(Some(e.to_string())),
            }
        });
    };

    let network_name = network::name(chain_id).unwrap_or("Unknown network");

    view! {
        <section class="card connector-demo">
            <p>"Chain Id: " {chain_id} " (" {network_name} ")"</p>
            <WalletConnector
                chain_id=chain_id
                handle=handle
                on_connect=on_connect
                on_change=on_change
                on_disconnect=on_disconnect
                dialog_title="Choose another text"
            />
            <p>
                "Connected address: "
                {move || address.get().map(|a| truncate_address(&a)).unwrap_or_else(|| "...".to_string())}
            </p>
            <div class="connector-demo-actions">
                <button class="btn" on:click=sign>"Sign message"</button>
                <button class="btn btn-secondary" on:click=move |_| handle.disconnect()>"Disconnect from outside"</button>
            </div>
            {move || signature.get().map(|sig| view! { <p class="signature">"Signature: " {truncate_address(&sig)}</p> })}
            {move || status.get().map(|msg| view! { <p class="status">{msg}</p> })}
        </section>
    }
}
