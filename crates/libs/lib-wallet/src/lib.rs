//! # Wallet Library
//!
//! Connects a web application to an injected EVM wallet or a remote wallet
//! reached through pairing, behind one [`WalletHandle`].
//!
//! ## Modules
//!
//! - [`backend`] - provider and pairing SDK boundaries
//! - [`wallet`] - the [`Wallet`] capability trait and [`WalletHandle`]
//! - [`injected`] / [`remote`] - the two adapters
//! - [`network`] - supported networks
//! - [`registry`] - adapter instances shared by widgets
//! - [`session`] - persisted session record
//! - [`state`] - widget UI state reducer
//! - [`connector`] - the orchestrator
//! - [`dialog`] - selection dialog model
//! - [`mock`] - deterministic backends
//!
//! ## Example
//!
//! ```rust
//! use lib_core::ConnectorConfig;
//! use lib_wallet::mock::{MockEthereum, MockPairing};
//! use lib_wallet::{CallbackHost, MemoryStorage, SessionStore, WalletConnector, WalletRegistry};
//! use std::sync::Arc;
//!
//! let registry = Arc::new(WalletRegistry::new(
//!     Some(Arc::new(MockEthereum::new(vec![], 56))),
//!     Arc::new(MockPairing::new(vec![], 56)),
//! ));
//! let store = SessionStore::new(Arc::new(MemoryStorage::new()), "wallet-connector");
//! let connector = WalletConnector::new(
//!     ConnectorConfig::default(),
//!     registry,
//!     store,
//!     Arc::new(CallbackHost::new().on_change(|address| println!("now {address}"))),
//! );
//! connector.connect();
//! assert!(connector.state().dialog_open);
//! ```

pub mod backend;
pub mod connector;
pub mod dialog;
pub mod injected;
pub mod mock;
pub mod network;
pub mod registry;
pub mod remote;
pub mod session;
pub mod state;
pub mod wallet;

// Re-export commonly used types
pub use backend::BackendKind;
pub use connector::{connected_wallet, CallbackHost, ConnectorHost, StateListener, WalletConnector};
pub use dialog::{DialogChoice, SUPPORTED_BACKENDS};
pub use registry::WalletRegistry;
pub use session::{KeyValueStorage, MemoryStorage, SessionRecord, SessionStore};
pub use state::{ModalKind, Phase, Transition, UiState};
pub use wallet::{DisconnectListener, Wallet, WalletHandle, WalletSnapshot};
