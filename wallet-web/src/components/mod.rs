//! UI Components

pub mod connector;
pub mod dialog;
pub mod modal;

pub use connector::WalletConnector;
pub use dialog::SelectWalletDialog;
pub use modal::ModalMessage;
