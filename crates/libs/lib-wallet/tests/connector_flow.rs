//! # Connector Flow Tests
//!
//! Drive the orchestrator end to end against the deterministic backends.

mod common;

use common::{GatedEthereum, Harness, HostEvent, ACCOUNT, OTHER_ACCOUNT};
use lib_core::{ConnectorConfig, ConnectorError};
use lib_wallet::backend::{Eip1193Provider, ProviderEvent, RpcMethod};
use lib_wallet::{
    connected_wallet, BackendKind, CallbackHost, DialogChoice, ModalKind, Phase, UiState, WalletConnector,
    WalletRegistry,
};
use parking_lot::Mutex;
use std::sync::Arc;

fn config(chain_id: u64) -> ConnectorConfig {
    ConnectorConfig::for_chain(chain_id)
}

// region:    --- Connect

#[tokio::test]
async fn test_injected_connect_on_same_chain() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));

    // Act
    connector.connect();
    assert_eq!(connector.state().phase, Phase::DialogOpen);
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Assert
    let state = connector.state();
    assert!(state.connected);
    assert_eq!(state.phase, Phase::Connected);
    assert_eq!(state.address, ACCOUNT);
    assert_eq!(state.chain_id, 56);
    assert_eq!(state.backend_kind, Some(BackendKind::Injected));
    assert!(!state.dialog_open);

    assert_eq!(harness.events(), vec![HostEvent::Connected("metamask:metamask".to_string())]);
    assert_eq!(harness.stored("wallet-connector-type").as_deref(), Some("metamask"));
    assert_eq!(harness.stored("wallet-connector-chain-id").as_deref(), Some("56"));

    let wallet = connector.wallet().expect("connected wallet");
    assert!(wallet.is_connected());
    assert_eq!(wallet.get_address().await.unwrap(), ACCOUNT);
    assert_eq!(harness.count_calls(RpcMethod::SwitchEthereumChain), 0);
}

#[tokio::test]
async fn test_unsupported_chain_opens_modal_without_backend_call() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(999999));

    // Act
    connector.connect();

    // Assert
    let state = connector.state();
    assert_eq!(state.phase, Phase::ErrorModal);
    assert!(!state.dialog_open);
    assert!(state.modal_open);
    assert_eq!(state.modal_kind, ModalKind::Error);
    assert_eq!(state.modal_title, "Unsupported network");
    assert_eq!(state.modal_message, "Unsupported network with chain Id: 999999");
    assert!(harness.ethereum.calls().is_empty());
    assert_eq!(harness.pairing.sessions_created(), 0);

    connector.close_modal();
    let state = connector.state();
    assert_eq!(state.phase, Phase::Idle);
    assert!(!state.modal_open);
}

#[tokio::test]
async fn test_remote_connect() {
    // Arrange
    let harness = Harness::new(56, 137);
    let connector = harness.connector(config(137));

    // Act
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Remote)).await;

    // Assert
    let state = connector.state();
    assert!(state.connected);
    assert_eq!(state.backend_kind, Some(BackendKind::Remote));
    assert_eq!(
        harness.events(),
        vec![HostEvent::Connected("walletconnect:wallet-connect-137".to_string())]
    );
    assert_eq!(harness.stored("wallet-connector-type").as_deref(), Some("walletconnect"));
    assert_eq!(harness.stored("wallet-connector-chain-id").as_deref(), Some("137"));
    assert!(harness.pairing.is_persisted("wallet-connect-137"));
}

#[tokio::test]
async fn test_injected_switches_and_registers_network() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(4002));

    // Act
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Assert
    assert!(connector.state().connected);
    assert_eq!(harness.ethereum.current_chain(), 4002);
    assert_eq!(harness.count_calls(RpcMethod::AddEthereumChain), 1);
    assert_eq!(harness.count_calls(RpcMethod::SwitchEthereumChain), 2);
    assert_eq!(harness.stored("wallet-connector-chain-id").as_deref(), Some("4002"));
}

#[tokio::test]
async fn test_chain_mismatch_names_current_network() {
    // Arrange
    let harness = Harness::new(56, 56);
    harness.ethereum.set_reject_switch(true);
    let connector = harness.connector(config(137));

    // Act
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Assert
    let state = connector.state();
    assert!(!state.connected);
    assert_eq!(state.phase, Phase::ErrorModal);
    assert_eq!(state.modal_title, "Wrong network");
    assert!(state.modal_message.contains("Binance Smart Chain (56)"));
    assert!(state.modal_message.contains("Polygon Mainnet (137)"));
    assert!(harness.events().is_empty());
    assert_eq!(harness.stored("wallet-connector-type"), None);
}

#[tokio::test]
async fn test_chain_mismatch_ignored() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(ConnectorConfig {
        ignore_chain_mismatch: true,
        ..config(137)
    });

    // Act
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Assert
    let state = connector.state();
    assert!(state.connected);
    assert_eq!(state.chain_id, 56);
    assert_eq!(harness.stored("wallet-connector-chain-id").as_deref(), Some("137"));
    assert_eq!(harness.count_calls(RpcMethod::SwitchEthereumChain), 0);
    assert_eq!(harness.ethereum.current_chain(), 56);
}

#[tokio::test]
async fn test_zero_chain_reports_invalid_chain_id() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(0));

    // Act
    connector.connect();

    // Assert
    let state = connector.state();
    assert_eq!(state.phase, Phase::ErrorModal);
    assert!(state.modal_open);
    assert!(!state.dialog_open);
    assert_eq!(state.modal_title, "Invalid chain id");
    assert!(harness.ethereum.calls().is_empty());
}

#[tokio::test]
async fn test_remote_chain_mismatch_kills_session() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(137));

    // Act
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Remote)).await;

    // Assert
    let state = connector.state();
    assert_eq!(state.phase, Phase::ErrorModal);
    assert!(state.modal_message.contains("Polygon Mainnet (137)"));
    assert!(!harness.pairing.is_persisted("wallet-connect-137"));
    assert!(harness.events().is_empty());
}

#[tokio::test]
async fn test_user_rejection_shows_modal() {
    // Arrange
    let harness = Harness::new(56, 56);
    harness.ethereum.set_reject_requests(true);
    let connector = harness.connector(config(56));

    // Act
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Assert
    let state = connector.state();
    assert_eq!(state.modal_title, "Connection rejected");
    assert!(!state.dialog_open);
    assert!(!state.connected);
}

#[tokio::test]
async fn test_missing_injected_provider() {
    // Arrange
    let harness = Harness::without_provider(56);
    let connector = harness.connector(config(56));

    // Act
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Assert
    let state = connector.state();
    assert_eq!(state.modal_title, "Metamask Not Found");
    assert_eq!(state.modal_message, "Metamask wallet wasn't installed");
}

#[tokio::test]
async fn test_dismissing_dialog_returns_to_idle() {
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));

    connector.connect();
    connector.select_backend(DialogChoice::from_key("")).await;

    assert_eq!(connector.state(), UiState::default());
    assert!(harness.ethereum.calls().is_empty());
}

#[tokio::test]
async fn test_stale_result_after_cancel_is_discarded() {
    // Arrange
    let harness = Harness::new(56, 56);
    let gated = Arc::new(GatedEthereum::new(harness.ethereum.clone()));
    gated.hold();
    let registry = Arc::new(WalletRegistry::new(
        Some(gated.clone() as Arc<dyn Eip1193Provider>),
        Arc::new(harness.pairing.clone()),
    ));
    let connects = Arc::new(Mutex::new(0));
    let counter = connects.clone();
    let connector = WalletConnector::new(
        config(56),
        registry,
        harness.store(),
        Arc::new(CallbackHost::new().on_connect(move |_, _| *counter.lock() += 1)),
    );

    // Act
    connector.connect();
    let pending = connector.select_backend(DialogChoice::Backend(BackendKind::Injected));
    let cancel = async {
        tokio::task::yield_now().await;
        assert_eq!(connector.state().phase, Phase::Connecting);
        connector.connect();
        connector.select_backend(DialogChoice::Dismissed).await;
        gated.release();
    };
    tokio::join!(pending, cancel);

    // Assert
    assert_eq!(connector.state(), UiState::default());
    assert_eq!(*connects.lock(), 0);
    assert_eq!(harness.stored("wallet-connector-type"), None);
    assert!(connector.wallet().is_none());
}

// endregion: --- Connect

// region:    --- Restore

#[tokio::test]
async fn test_silent_restore_of_authorized_injected_wallet() {
    // Arrange
    let first = Harness::new(56, 56);
    let connector = first.connector(config(56));
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;
    let page = first.reload();
    let restored = page.connector(config(56));

    // Act
    restored.mount().await;

    // Assert
    let state = restored.state();
    assert!(state.connected);
    assert!(!state.dialog_open);
    assert_eq!(state.address, ACCOUNT);
    assert_eq!(page.events(), vec![HostEvent::Connected("metamask:metamask".to_string())]);
    // One from the first page, one silent re-check on restore
    assert_eq!(page.count_calls(RpcMethod::RequestAccounts), 2);
    assert_eq!(page.count_calls(RpcMethod::SwitchEthereumChain), 0);
}

#[tokio::test]
async fn test_restore_switches_back_wallet_moved_to_other_chain() {
    // Arrange
    let first = Harness::new(56, 56);
    let connector = first.connector(config(56));
    connector.mount().await;
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;
    first.ethereum.emit_chain_changed(137);
    let page = first.reload();
    let restored = page.connector(config(56));

    // Act
    restored.mount().await;

    // Assert
    let state = restored.state();
    assert!(state.connected);
    assert_eq!(state.chain_id, 56);
    assert_eq!(page.ethereum.current_chain(), 56);
    assert_eq!(page.count_calls(RpcMethod::SwitchEthereumChain), 1);
    assert_eq!(page.events(), vec![HostEvent::Connected("metamask:metamask".to_string())]);
}

#[tokio::test]
async fn test_restore_reports_wallet_stuck_on_other_chain() {
    // Arrange
    let first = Harness::new(56, 56);
    let connector = first.connector(config(56));
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;
    first.ethereum.emit_chain_changed(137);
    first.ethereum.set_reject_switch(true);
    let page = first.reload();
    let restored = page.connector(config(56));

    // Act
    restored.mount().await;

    // Assert
    let state = restored.state();
    assert!(!state.connected);
    assert_eq!(state.phase, Phase::ErrorModal);
    assert_eq!(state.modal_title, "Wrong network");
    assert!(restored.wallet().is_none());
    assert!(page.events().is_empty());
    assert_eq!(page.ethereum.current_chain(), 137);
}

#[tokio::test]
async fn test_silent_restore_of_remote_session() {
    // Arrange
    let first = Harness::new(56, 56);
    let connector = first.connector(config(56));
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Remote)).await;
    let page = first.reload();
    let restored = page.connector(config(56));

    // Act
    restored.mount().await;

    // Assert
    assert!(restored.state().connected);
    assert_eq!(
        page.events(),
        vec![HostEvent::Connected("walletconnect:wallet-connect-56".to_string())]
    );
    assert_eq!(page.pairing.sessions_created(), 1);
}

#[tokio::test]
async fn test_restore_reconnects_when_backend_forgot_us() {
    // Arrange
    let harness = Harness::new(56, 56);
    harness.store().save(BackendKind::Injected, 56);
    let connector = harness.connector(config(56));

    // Act
    connector.mount().await;

    // Assert
    assert!(connector.state().connected);
    assert_eq!(harness.count_calls(RpcMethod::RequestAccounts), 1);
    assert_eq!(harness.events().len(), 1);
}

#[tokio::test]
async fn test_restore_without_provider_clears_session() {
    // Arrange
    let harness = Harness::without_provider(56);
    harness.store().save(BackendKind::Injected, 56);
    let connector = harness.connector(config(56));

    // Act
    connector.mount().await;

    // Assert
    assert_eq!(connector.state(), UiState::default());
    assert_eq!(harness.store().read(), None);
    assert!(harness.events().is_empty());
}

#[tokio::test]
async fn test_mount_without_record_stays_idle() {
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));

    connector.mount().await;
    connector.mount().await;

    assert_eq!(connector.state(), UiState::default());
    assert!(harness.ethereum.calls().is_empty());
}

// endregion: --- Restore

// region:    --- Disconnect and backend events

#[tokio::test]
async fn test_disconnect_clears_session() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;
    let wallet = connector.wallet().expect("connected wallet");

    // Act
    connector.disconnect().await;
    connector.disconnect().await;

    // Assert
    assert_eq!(connector.state(), UiState::default());
    assert!(connector.wallet().is_none());
    assert!(!wallet.is_connected());
    assert_eq!(wallet.get_address().await.unwrap(), "");
    assert_eq!(harness.store().read(), None);
    assert_eq!(
        harness.events(),
        vec![
            HostEvent::Connected("metamask:metamask".to_string()),
            HostEvent::Disconnected(None)
        ]
    );
}

#[tokio::test]
async fn test_external_injected_disconnect() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Act
    harness.ethereum.emit_disconnect();

    // Assert
    assert!(!connector.state().connected);
    assert_eq!(harness.store().read(), None);
    assert_eq!(harness.events().last(), Some(&HostEvent::Disconnected(None)));
}

#[tokio::test]
async fn test_external_remote_disconnect_carries_error() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Remote)).await;

    // Act
    harness
        .pairing
        .remote_disconnect("wallet-connect-56", Some("Session update rejected"));

    // Assert
    assert!(!connector.state().connected);
    assert_eq!(harness.store().read(), None);
    assert_eq!(
        harness.events().last(),
        Some(&HostEvent::Disconnected(Some(ConnectorError::TransportFailure(
            "Session update rejected".to_string()
        ))))
    );
}

#[tokio::test]
async fn test_disconnect_listener_registered_once_per_handle() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));
    for _ in 0..2 {
        connector.connect();
        connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;
        connector.disconnect().await;
    }
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Act
    harness.ethereum.emit_disconnect();

    // Assert
    assert_eq!(harness.ethereum.listener_count(ProviderEvent::Disconnect), 1);
    let disconnects = harness
        .events()
        .iter()
        .filter(|e| **e == HostEvent::Disconnected(None))
        .count();
    assert_eq!(disconnects, 3);
    assert!(!connector.state().connected);
}

#[tokio::test]
async fn test_account_change_notifies_host() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));
    connector.mount().await;
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Act
    harness
        .ethereum
        .emit_accounts_changed(vec![OTHER_ACCOUNT.to_lowercase()]);
    harness.ethereum.emit_accounts_changed(vec![OTHER_ACCOUNT.to_string()]);

    // Assert
    let state = connector.state();
    assert!(state.connected);
    assert_eq!(state.address, OTHER_ACCOUNT);
    assert_eq!(
        harness.events(),
        vec![
            HostEvent::Connected("metamask:metamask".to_string()),
            HostEvent::Changed(OTHER_ACCOUNT.to_string())
        ]
    );
}

#[tokio::test]
async fn test_chain_change_requests_hard_reset() {
    // Arrange
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));
    connector.mount().await;
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Act
    harness.ethereum.emit_chain_changed(137);

    // Assert
    assert_eq!(connector.state(), UiState::default());
    assert_eq!(harness.events().last(), Some(&HostEvent::HardReset));
    assert!(harness.store().read().is_some());
}

#[tokio::test]
async fn test_chain_change_ignored_for_remote_session() {
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));
    connector.mount().await;
    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Remote)).await;

    harness.ethereum.emit_chain_changed(137);

    assert!(connector.state().connected);
    assert!(!harness.events().contains(&HostEvent::HardReset));
}

// endregion: --- Disconnect and backend events

// region:    --- Shared registry

#[tokio::test]
async fn test_widgets_share_injected_handle() {
    // Arrange
    let harness = Harness::new(56, 56);
    let bsc = harness.connector(config(56));
    let fantom = harness.connector(config(4002));

    // Act
    bsc.connect();
    bsc.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    // Assert
    assert!(fantom.wallet().is_none());
    let shared = connected_wallet(&harness.registry, &harness.store(), &config(4002)).expect("recorded wallet");
    assert!(shared.same_as(&bsc.wallet().expect("connected wallet")));
    assert!(shared.is_connected());
}

#[tokio::test]
async fn test_state_listeners_follow_transitions() {
    let harness = Harness::new(56, 56);
    let connector = harness.connector(config(56));
    let phases = Arc::new(Mutex::new(Vec::new()));
    let sink = phases.clone();
    connector.subscribe(Arc::new(move |state| sink.lock().push(state.phase)));

    connector.connect();
    connector.select_backend(DialogChoice::Backend(BackendKind::Injected)).await;

    assert_eq!(
        *phases.lock(),
        vec![Phase::DialogOpen, Phase::Connecting, Phase::Connected]
    );
}

// endregion: --- Shared registry
