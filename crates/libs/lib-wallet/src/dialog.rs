//! Selection dialog model.

use crate::backend::BackendKind;
use lib_utils::to_key;

/// Backends offered by the dialog, in display order.
pub const SUPPORTED_BACKENDS: [BackendKind; 2] = [BackendKind::Injected, BackendKind::Remote];

/// How the dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogChoice {
    Backend(BackendKind),
    Dismissed,
}

impl DialogChoice {
    /// Map a dialog entry label or key back to a choice; anything else is a dismissal.
    pub fn from_key(key: &str) -> Self {
        BackendKind::from_key(&to_key(key))
            .map(DialogChoice::Backend)
            .unwrap_or(DialogChoice::Dismissed)
    }
}
