//! Browser backends for the wallet library.

pub mod ethereum;
pub mod pairing;
pub mod storage;

pub use ethereum::BrowserEthereum;
pub use pairing::BrowserPairing;
pub use storage::LocalStorage;
