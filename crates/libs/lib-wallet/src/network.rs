//! # Network Registry
//!
//! Immutable reference data for the chains the connector supports. Used to
//! reject unsupported targets before the selection dialog opens and to build
//! the `wallet_addEthereumChain` payload when a wallet does not know a chain.

use lib_core::ConnectorError;
use lib_utils::to_chain_id_string;
use shared::dto::{AddChainParams, NativeCurrency};

/// One supported network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkEntry {
    pub chain_id: u64,
    pub name: &'static str,
    pub currency: &'static str,
    pub decimals: u8,
    pub rpc_urls: &'static [&'static str],
    pub explorer_urls: &'static [&'static str],
}

static NETWORKS: [NetworkEntry; 7] = [
    NetworkEntry {
        chain_id: 1,
        name: "Ethereum Mainnet",
        currency: "ETH",
        decimals: 18,
        rpc_urls: &["https://cloudflare-eth.com"],
        explorer_urls: &["https://etherscan.io/"],
    },
    NetworkEntry {
        chain_id: 56,
        name: "Binance Smart Chain",
        currency: "BNB",
        decimals: 18,
        rpc_urls: &["https://bsc-dataseed.binance.org/"],
        explorer_urls: &["https://bscscan.com/"],
    },
    NetworkEntry {
        chain_id: 137,
        name: "Polygon Mainnet",
        currency: "MATIC",
        decimals: 18,
        rpc_urls: &["https://polygon-rpc.com"],
        explorer_urls: &["https://polygonscan.com/"],
    },
    NetworkEntry {
        chain_id: 250,
        name: "Fantom Opera",
        currency: "FTM",
        decimals: 18,
        rpc_urls: &["https://rpc2.fantom.network/"],
        explorer_urls: &["https://ftmscan.com/"],
    },
    NetworkEntry {
        chain_id: 4002,
        name: "Fantom Testnet",
        currency: "FTM",
        decimals: 18,
        rpc_urls: &["https://xapi.testnet.fantom.network/lachesis"],
        explorer_urls: &["https://testnet.ftmscan.com"],
    },
    NetworkEntry {
        chain_id: 31337,
        name: "Localhost",
        currency: "TEST",
        decimals: 18,
        rpc_urls: &["http://127.0.0.1:8545"],
        explorer_urls: &["http://127.0.0.1:8545"],
    },
    NetworkEntry {
        chain_id: 80001,
        name: "Mumbai Testnet",
        currency: "MATIC",
        decimals: 18,
        rpc_urls: &["https://rpc-mumbai.matic.today/"],
        explorer_urls: &["https://mumbai.polygonscan.com/"],
    },
];

/// All supported networks.
pub fn networks() -> &'static [NetworkEntry] {
    &NETWORKS
}

pub fn entry(chain_id: u64) -> Option<&'static NetworkEntry> {
    NETWORKS.iter().find(|n| n.chain_id == chain_id)
}

/// Display name of a supported chain.
pub fn name(chain_id: u64) -> Option<&'static str> {
    entry(chain_id).map(|n| n.name)
}

pub fn is_supported(chain_id: u64) -> bool {
    entry(chain_id).is_some()
}

/// Registration payload for `wallet_addEthereumChain`.
pub fn add_chain_params(chain_id: u64) -> Option<AddChainParams> {
    entry(chain_id).map(|n| AddChainParams {
        chain_id: to_chain_id_string(n.chain_id),
        chain_name: n.name.to_string(),
        native_currency: NativeCurrency {
            name: n.currency.to_string(),
            symbol: n.currency.to_string(),
            decimals: n.decimals,
        },
        rpc_urls: n.rpc_urls.iter().map(|u| u.to_string()).collect(),
        block_explorer_urls: n.explorer_urls.iter().map(|u| u.to_string()).collect(),
    })
}

/// Display label for error messages; unknown chains fall back to their id.
fn label(chain_id: u64) -> String {
    name(chain_id)
        .map(str::to_string)
        .unwrap_or_else(|| format!("chain {}", chain_id))
}

/// Build a [`ConnectorError::ChainMismatch`] naming both networks.
pub fn chain_mismatch(expected: u64, actual: u64) -> ConnectorError {
    ConnectorError::ChainMismatch {
        expected,
        expected_name: label(expected),
        actual,
        actual_name: label(actual),
    }
}
