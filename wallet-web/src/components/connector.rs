//! `<WalletConnector/>`: connect button, selection dialog and message modal
//! around one [`lib_wallet::WalletConnector`].

use leptos::callback::{Callable, Callback};
use leptos::children::ViewFn;
use leptos::ev::MouseEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use lib_core::ConnectorError;
use lib_wallet::{CallbackHost, DialogChoice, Phase, UiState, WalletHandle};
use std::sync::Arc;

use crate::components::{ModalMessage, SelectWalletDialog};
use crate::state::{ConnectorContext, ConnectorHandle, WidgetOptions};
use crate::utils::url::reload_page;

#[component]
pub fn WalletConnector(
    /// Network the wallet must be on, 56 by default
    #[prop(optional)]
    chain_id: Option<u64>,
    /// JSON configuration, explicit props take precedence
    #[prop(optional, into)]
    config: Option<String>,
    #[prop(optional, into)] dialog_title: Option<String>,
    #[prop(optional)] ignore_chain_mismatch: bool,
    #[prop(optional)] hide_disconnect_button: bool,
    /// Render only the dialog and modal, drive the widget through `handle`
    #[prop(optional)]
    invisible: bool,
    #[prop(optional, into)] on_connect: Option<Callback<(Option<ConnectorError>, WalletHandle)>>,
    #[prop(optional, into)] on_disconnect: Option<Callback<Option<ConnectorError>>>,
    #[prop(optional, into)] on_change: Option<Callback<String>>,
    /// Replaces the default page reload after an injected chain change
    #[prop(optional, into)]
    on_hard_reset: Option<Callback<()>>,
    #[prop(optional, into)] connect_button: Option<ViewFn>,
    #[prop(optional, into)] disconnect_button: Option<ViewFn>,
    #[prop(optional)] handle: Option<ConnectorHandle>,
) -> impl IntoView {
    let config = WidgetOptions {
        config_json: config,
        chain_id,
        dialog_title,
        ignore_chain_mismatch,
        hide_disconnect_button,
        invisible,
    }
    .resolve();

    let hide_disconnect_button = config.hide_disconnect_button;
    let invisible = config.invisible;
    let dialog_title = config.dialog_title.clone();

    let context = use_context::<ConnectorContext>().unwrap_or_else(|| ConnectorContext::browser(&config.pairing_bridge));

    let host = CallbackHost::new()
        .on_connect(move |error, wallet| {
            if let Some(cb) = on_connect {
                cb.run((error.cloned(), wallet.clone()));
            }
        })
        .on_disconnect(move |error| {
            if let Some(cb) = on_disconnect {
                cb.run(error.cloned());
            }
        })
        .on_change(move |address| {
            if let Some(cb) = on_change {
                cb.run(address.to_string());
            }
        })
        .on_hard_reset(move || match on_hard_reset {
            Some(cb) => cb.run(()),
            None => reload_page(),
        });

    let connector = lib_wallet::WalletConnector::new(
        config.clone(),
        context.registry(),
        context.store(&config.storage_namespace),
        Arc::new(host),
    );

    let state = RwSignal::new(connector.state());
    connector.subscribe(Arc::new(move |next: &UiState| {
        // The widget may already be unmounted
        let _ = state.try_set(next.clone());
    }));

    if let Some(handle) = handle {
        handle.attach(connector.clone());
    }

    let mounting = connector.clone();
    spawn_local(async move {
        mounting.mount().await;
    });

    let connector = StoredValue::new(connector);

    let on_select = Callback::new(move |choice: DialogChoice| {
        let connector = connector.get_value();
        spawn_local(async move {
            connector.select_backend(choice).await;
        });
    });
    let on_modal_close = Callback::new(move |_: ()| connector.with_value(|c| c.close_modal()));
    let press_connect = move |_: MouseEvent| connector.with_value(|c| c.connect());
    let press_disconnect = move |_: MouseEvent| {
        let connector = connector.get_value();
        spawn_local(async move {
            connector.disconnect().await;
        });
    };

    let show_disconnect = move || !hide_disconnect_button && state.with(|s| s.connected);
    let trigger = move || {
        if show_disconnect() {
            let content = match &disconnect_button {
                Some(content) => content.run(),
                None => view! { <button class="btn">"Disconnect"</button> }.into_any(),
            };
            view! { <span class="wallet-connector-trigger" on:click=press_disconnect>{content}</span> }.into_any()
        } else {
            let content = match &connect_button {
                Some(content) => content.run(),
                None => view! { <button class="btn">"Connect"</button> }.into_any(),
            };
            view! { <span class="wallet-connector-trigger" on:click=press_connect>{content}</span> }.into_any()
        }
    };

    view! {
        <div class="wallet-connector">
            {(!invisible).then_some(trigger)}
            <SelectWalletDialog
                open=Signal::derive(move || state.with(|s| s.dialog_open))
                busy=Signal::derive(move || state.with(|s| s.phase == Phase::Connecting))
                title=dialog_title
                on_close=on_select
            />
            <ModalMessage state=state on_close=on_modal_close/>
        </div>
    }
}
