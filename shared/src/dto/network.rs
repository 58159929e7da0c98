use serde::{Deserialize, Serialize};

/// Native currency of a network, as a wallet expects it during registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Parameters of `wallet_addEthereumChain` (EIP-3085).
///
/// `chain_id` is the `0x`-prefixed lowercase hex form of the numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChainParams {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

/// Parameters of `wallet_switchEthereumChain` (EIP-3326).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchChainParams {
    pub chain_id: String,
}
