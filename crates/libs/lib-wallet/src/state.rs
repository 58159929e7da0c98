//! # Widget UI State
//!
//! The widget's state only changes through [`reduce`], which maps the current
//! [`UiState`] and one [`Transition`] to the next state.
//!
//! ```text
//!            OpenDialog              BeginConnect
//!   Idle ───────────────▶ DialogOpen ────────────▶ Connecting ──Connected──▶ Connected
//!    ▲  ◀──CloseDialog─────┘                          │                        │
//!    │                                       OpenModal (error)            Disconnected
//!    └────CloseModal──── ErrorModal ◀─────────────────┘                        │
//!    ◀─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::backend::BackendKind;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Phase {
    #[default]
    Idle,
    DialogOpen,
    Connecting,
    Connected,
    ErrorModal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalKind {
    #[default]
    Info,
    Error,
    Success,
    Warning,
}

impl ModalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModalKind::Info => "info",
            ModalKind::Error => "error",
            ModalKind::Success => "success",
            ModalKind::Warning => "warning",
        }
    }
}

/// Everything the widget renders.
///
/// `connected` implies a non-empty `address` and a known `backend_kind`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct UiState {
    pub phase: Phase,
    pub connected: bool,
    pub address: String,
    pub chain_id: u64,
    pub backend_kind: Option<BackendKind>,
    pub dialog_open: bool,
    pub modal_open: bool,
    pub modal_kind: ModalKind,
    pub modal_title: String,
    pub modal_message: String,
}

impl UiState {
    /// Phase once nothing is in flight.
    fn settled_phase(&self) -> Phase {
        if self.modal_open {
            Phase::ErrorModal
        } else if self.dialog_open {
            Phase::DialogOpen
        } else if self.connected {
            Phase::Connected
        } else {
            Phase::Idle
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    OpenDialog,
    CloseDialog,
    BeginConnect {
        kind: BackendKind,
    },
    OpenModal {
        kind: ModalKind,
        title: String,
        message: String,
    },
    CloseModal,
    Connected {
        kind: BackendKind,
        address: String,
        chain_id: u64,
    },
    Disconnected,
    AccountChanged {
        kind: BackendKind,
        address: String,
    },
    Reset,
}

pub fn reduce(state: &UiState, transition: &Transition) -> UiState {
    let mut next = state.clone();

    match transition {
        Transition::OpenDialog => {
            next.dialog_open = true;
            next.phase = next.settled_phase();
        }
        Transition::CloseDialog => {
            next.dialog_open = false;
            next.phase = next.settled_phase();
        }
        Transition::BeginConnect { kind } => {
            debug!(backend = %kind, "connect started");
            next.phase = Phase::Connecting;
        }
        Transition::OpenModal { kind, title, message } => {
            next.dialog_open = false;
            next.modal_open = true;
            next.modal_kind = *kind;
            next.modal_title = title.clone();
            next.modal_message = message.clone();
            next.phase = Phase::ErrorModal;
        }
        Transition::CloseModal => {
            next.modal_open = false;
            next.phase = next.settled_phase();
        }
        Transition::Connected { kind, address, chain_id } => {
            if address.is_empty() {
                debug!(backend = %kind, "refusing connected transition without an address");
                return next;
            }
            next.connected = true;
            next.address = address.clone();
            next.chain_id = *chain_id;
            next.backend_kind = Some(*kind);
            next.dialog_open = false;
            next.phase = next.settled_phase();
        }
        Transition::Disconnected => {
            next.connected = false;
            next.address.clear();
            next.chain_id = 0;
            next.backend_kind = None;
            next.phase = next.settled_phase();
        }
        Transition::AccountChanged { kind, address } => {
            if next.connected && next.backend_kind == Some(*kind) && !address.is_empty() {
                next.address = address.clone();
            }
        }
        Transition::Reset => return UiState::default(),
    }

    next
}
