use serde::{Deserialize, Serialize};

/// Native currency of a chain, in the shape wallets expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain descriptor in the exact shape of `wallet_addEthereumChain` params,
/// so a config can be serialized and handed to the wallet as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    /// Hex chain id, e.g. "0xc352".
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    #[serde(default)]
    pub block_explorer_urls: Vec<String>,
}

impl NetworkConfig {
    /// The RPC endpoint used for provider construction. Preset configs
    /// always carry at least one URL.
    pub fn primary_rpc(&self) -> &str {
        self.rpc_urls.first().map(String::as_str).unwrap_or("")
    }

    /// Chain id as a number, if the hex string parses.
    pub fn chain_id_u64(&self) -> Option<u64> {
        crate::wallet::parse_chain_id(&self.chain_id)
    }
}

/// Contract address of the SmartWill deployment on Pharos Devnet.
pub const DEFAULT_CONTRACT: &str = "0x41c3f0f5e9a4677d7a54fccb570165fb1c9b5ef4";

/// Get a chain configuration preset by name.
pub fn get_chain_config(name: &str) -> Option<NetworkConfig> {
    match name.to_lowercase().as_str() {
        "pharos" | "pharos-devnet" | "devnet" => Some(NetworkConfig {
            chain_id: "0xc352".to_string(), // 50002
            chain_name: "Pharos Devnet".to_string(),
            native_currency: NativeCurrency {
                name: "Pharos".to_string(),
                symbol: "DPLS".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://devnet.dplabs-internal.com/".to_string()],
            block_explorer_urls: vec!["https://docs.pharosnetwork.xyz/".to_string()],
        }),
        "pharos-testnet" | "testnet" => Some(NetworkConfig {
            chain_id: "0xc368".to_string(), // 50024
            chain_name: "Pharos Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "Pharos".to_string(),
                symbol: "PHRS".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://testnet.dplabs-internal.com/".to_string()],
            block_explorer_urls: vec!["https://testnet.pharosscan.xyz/".to_string()],
        }),
        _ => None,
    }
}

/// Return a list of all supported chain preset names.
pub fn supported_chains() -> Vec<&'static str> {
    vec!["pharos", "pharos-testnet"]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pharos_config() {
        let config = get_chain_config("pharos").unwrap();
        assert_eq!(config.chain_id, "0xc352");
        assert_eq!(config.chain_id_u64(), Some(50002));
        assert_eq!(config.native_currency.symbol, "DPLS");
        assert_eq!(config.native_currency.decimals, 18);
        assert_eq!(config.primary_rpc(), "https://devnet.dplabs-internal.com/");
    }

    #[test]
    fn test_pharos_aliases() {
        assert!(get_chain_config("devnet").is_some());
        assert!(get_chain_config("Pharos-Devnet").is_some());
        assert!(get_chain_config("PHAROS").is_some());
    }

    #[test]
    fn test_unknown_chain() {
        assert!(get_chain_config("mainnet").is_none());
        assert!(get_chain_config("unknown").is_none());
    }

    #[test]
    fn test_supported_chains() {
        let chains = supported_chains();
        assert_eq!(chains.len(), 2);
        assert!(chains.contains(&"pharos"));
    }

    #[test]
    fn test_wallet_param_shape() {
        // Serialized key casing must match what wallets expect verbatim.
        let config = get_chain_config("pharos").unwrap();
        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("chainId").is_some());
        assert!(value.get("chainName").is_some());
        assert!(value.get("nativeCurrency").is_some());
        assert!(value.get("rpcUrls").is_some());
        assert!(value.get("blockExplorerUrls").is_some());
        assert_eq!(value["nativeCurrency"]["decimals"], 18);
    }

    #[test]
    fn test_roundtrip() {
        let config = get_chain_config("pharos").unwrap();
        let json = serde_json::to_string(&config).unwrap();
        let back: NetworkConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
