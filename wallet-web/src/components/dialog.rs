//! Wallet selection dialog

use leptos::callback::{Callable, Callback};
use leptos::prelude::*;
use lib_wallet::{BackendKind, DialogChoice, SUPPORTED_BACKENDS};

#[component]
pub fn SelectWalletDialog(
    /// Whether the dialog is shown
    #[prop(into)]
    open: Signal<bool>,
    /// A connect attempt is in flight
    #[prop(into)]
    busy: Signal<bool>,
    #[prop(into)] title: String,
    /// Receives the picked backend, or `Dismissed`
    on_close: Callback<DialogChoice>,
) -> impl IntoView {
    let entry = move |kind: BackendKind| {
        view! {
            <li
                class="wallet-option"
                class:disabled=move || busy.get()
                on:click=move |_| on_close.run(DialogChoice::Backend(kind))
            >
                <img class="wallet-option-icon" src=kind.icon_url() alt=kind.display_name()/>
                <span class="wallet-option-name">{kind.display_name()}</span>
            </li>
        }
    };

    view! {
        <Show when=move || open.get()>
            <div class="wallet-dialog-backdrop" on:click=move |_| on_close.run(DialogChoice::Dismissed)>
                <div class="wallet-dialog" on:click=|ev| ev.stop_propagation()>
                    <h2 class="wallet-dialog-title">{title.clone()}</h2>
                    <ul class="wallet-options">
                        {SUPPORTED_BACKENDS.into_iter().map(entry).collect_view()}
                    </ul>
                    <Show when=move || busy.get()>
                        <p class="wallet-dialog-status">"Waiting for wallet..."</p>
                    </Show>
                    <button class="btn btn-secondary" on:click=move |_| on_close.run(DialogChoice::Dismissed)>
                        "Cancel"
                    </button>
                </div>
            </div>
        </Show>
    }
}
