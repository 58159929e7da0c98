//! # Core Library
//!
//! Error taxonomy and widget configuration shared by the connector crates.

pub mod config;
pub mod error;

// Re-export commonly used types
pub use config::ConnectorConfig;
pub use error::{ConnectorError, Result};
