//! Browser helpers

pub mod url;
