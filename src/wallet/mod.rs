pub mod software;

use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use crate::data::chains::NetworkConfig;

/// Where to point users who start the client without a signing key.
pub const WALLET_SETUP_URL: &str = "https://docs.pharosnetwork.xyz/";

// EIP-1193 provider error codes. Only UNRECOGNIZED_CHAIN is handled
// programmatically (add-chain fallback); the rest are reporting only.
pub const USER_REJECTED: i64 = 4001;
pub const UNSUPPORTED_METHOD: i64 = 4200;
pub const UNRECOGNIZED_CHAIN: i64 = 4902;
pub const INTERNAL_ERROR: i64 = -32603;

/// Error surfaced by a wallet provider, carrying the EIP-1193 numeric code.
#[derive(Debug, Clone, Error)]
#[error("{message} (code {code})")]
pub struct ProviderError {
    pub code: i64,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn unrecognized_chain(chain_id: &str) -> Self {
        Self::new(
            UNRECOGNIZED_CHAIN,
            format!("Unrecognized chain ID {chain_id}. Try adding the chain first."),
        )
    }

    pub fn unsupported_method(method: &str) -> Self {
        Self::new(
            UNSUPPORTED_METHOD,
            format!("the wallet does not support method {method}"),
        )
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(-32602, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN
    }
}

/// The wallet seam the session coordinator talks through, modeled on the
/// EIP-1193 `request({method, params})` surface plus the `chainChanged`
/// subscription. Supported methods: `eth_requestAccounts`, `eth_accounts`,
/// `eth_chainId`, `eth_getBalance`, `wallet_switchEthereumChain`,
/// `wallet_addEthereumChain`.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Dispatch a wallet/RPC request. `params` follows the JSON-RPC
    /// positional-array convention of the corresponding method.
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError>;

    /// Signer for transaction-sending contract calls.
    fn signer(&self) -> PrivateKeySigner;

    /// Descriptor of the chain the wallet is currently on.
    fn active_chain(&self) -> NetworkConfig;

    /// Subscribe to chain-change notifications. The channel value is the
    /// hex chain id the wallet switched to.
    fn subscribe_chain_changed(&self) -> watch::Receiver<String>;
}

/// Format a numeric chain id in the "0x..." form wallets use.
pub fn format_chain_id(id: u64) -> String {
    format!("{id:#x}")
}

/// Parse a chain id in either "0x..." hex or decimal string form.
pub fn parse_chain_id(s: &str) -> Option<u64> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}

/// Compare two chain ids regardless of representation ("0xc352" == "50002").
pub fn same_chain(a: &str, b: &str) -> bool {
    match (parse_chain_id(a), parse_chain_id(b)) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
