//! Message modal for connect errors

use leptos::callback::{Callable, Callback};
use leptos::prelude::*;
use lib_wallet::UiState;

#[component]
pub fn ModalMessage(#[prop(into)] state: Signal<UiState>, on_close: Callback<()>) -> impl IntoView {
    let kind = move || state.with(|s| s.modal_kind.as_str());
    let title = move || state.with(|s| s.modal_title.clone());
    let message = move || state.with(|s| s.modal_message.clone());

    view! {
        <Show when=move || state.with(|s| s.modal_open)>
            <div class="wallet-modal-backdrop" on:click=move |_| on_close.run(())>
                <div
                    class=move || format!("wallet-modal wallet-modal-{}", kind())
                    role="alertdialog"
                    on:click=|ev| ev.stop_propagation()
                >
                    <h3 class="wallet-modal-title">{title}</h3>
                    <p class="wallet-modal-message">{message}</p>
                    <button class="btn" on:click=move |_| on_close.run(())>"Close"</button>
                </div>
            </div>
        </Show>
    }
}
