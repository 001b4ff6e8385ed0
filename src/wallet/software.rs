use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::watch;

use crate::data::chains::NetworkConfig;
use crate::wallet::{ProviderError, WalletProvider, same_chain};

const CHAINS_FILE: &str = "chains.json";
const APP_DIR: &str = "will-tui";

/// In-process wallet: a local signing key plus a registry of known chains.
/// Speaks the EIP-1193 request surface the session coordinator expects.
/// Switching chain re-points the active RPC endpoint; a switch to an
/// unregistered chain fails with code 4902 until the chain is added.
pub struct SoftwareWallet {
    signer: PrivateKeySigner,
    registry: RwLock<ChainRegistry>,
    chain_tx: watch::Sender<String>,
    registry_path: Option<PathBuf>,
}

struct ChainRegistry {
    /// Index into `chains` of the chain the wallet is currently on.
    active: usize,
    /// Registered chains. Index 0 is the compiled-in home chain; the rest
    /// were added at runtime and persist across sessions.
    chains: Vec<NetworkConfig>,
}

impl SoftwareWallet {
    /// Build a wallet on `home`, picking up chains previously added via
    /// `wallet_addEthereumChain` from the config directory.
    pub fn new(signer: PrivateKeySigner, home: NetworkConfig) -> Self {
        Self::with_registry_path(signer, home, registry_path())
    }

    pub fn with_registry_path(
        signer: PrivateKeySigner,
        home: NetworkConfig,
        registry_path: Option<PathBuf>,
    ) -> Self {
        let mut chains = vec![home.clone()];
        if let Some(ref path) = registry_path {
            for persisted in load_chains(path) {
                if !chains.iter().any(|c| same_chain(&c.chain_id, &persisted.chain_id)) {
                    chains.push(persisted);
                }
            }
        }

        let (chain_tx, _) = watch::channel(home.chain_id.clone());
        Self {
            signer,
            registry: RwLock::new(ChainRegistry { active: 0, chains }),
            chain_tx,
            registry_path,
        }
    }

    fn switch_to(&self, chain_id: &str) -> Result<Value, ProviderError> {
        let mut registry = self.registry.write().expect("chain registry poisoned");
        let position = registry
            .chains
            .iter()
            .position(|c| same_chain(&c.chain_id, chain_id));
        match position {
            Some(index) => {
                registry.active = index;
                let id = registry.chains[index].chain_id.clone();
                drop(registry);
                self.chain_tx.send_replace(id);
                Ok(Value::Null)
            }
            None => Err(ProviderError::unrecognized_chain(chain_id)),
        }
    }

    fn add_chain(&self, config: NetworkConfig) -> Result<Value, ProviderError> {
        if config.chain_id_u64().is_none() {
            return Err(ProviderError::invalid_params(format!(
                "invalid chainId {:?}",
                config.chain_id
            )));
        }
        if config.rpc_urls.iter().all(|u| u.trim().is_empty()) {
            return Err(ProviderError::invalid_params(
                "chain descriptor has no usable rpcUrls",
            ));
        }

        {
            let mut registry = self.registry.write().expect("chain registry poisoned");
            let position = registry
                .chains
                .iter()
                .position(|c| same_chain(&c.chain_id, &config.chain_id));
            match position {
                Some(index) => {
                    registry.chains[index] = config.clone();
                    registry.active = index;
                }
                None => {
                    registry.chains.push(config.clone());
                    registry.active = registry.chains.len() - 1;
                }
            }
            self.persist(&registry.chains);
        }

        self.chain_tx.send_replace(config.chain_id);
        Ok(Value::Null)
    }

    /// Persist runtime-added chains. Best-effort: a failed write leaves the
    /// registry usable for the rest of the session.
    fn persist(&self, chains: &[NetworkConfig]) {
        let Some(ref path) = self.registry_path else {
            return;
        };
        let custom = &chains[1..];
        if let Some(parent) = path.parent() {
            if fs::create_dir_all(parent).is_err() {
                return;
            }
        }
        if let Ok(json) = serde_json::to_string_pretty(custom) {
            let _ = fs::write(path, json);
        }
    }

    async fn fetch_balance(&self, params: &Value) -> Result<Value, ProviderError> {
        let address: Address = params
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| ProviderError::invalid_params("eth_getBalance expects [address, tag]"))?
            .parse()
            .map_err(|e| ProviderError::invalid_params(format!("invalid address: {e}")))?;

        let url = self
            .active_chain()
            .primary_rpc()
            .parse()
            .map_err(|e| ProviderError::internal(format!("invalid rpc url: {e}")))?;
        let provider = ProviderBuilder::new().on_http(url);
        let balance = provider
            .get_balance(address)
            .await
            .map_err(|e| ProviderError::internal(format!("balance query failed: {e}")))?;
        Ok(json!(format!("{balance:#x}")))
    }
}

#[async_trait]
impl WalletProvider for SoftwareWallet {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        match method {
            "eth_requestAccounts" | "eth_accounts" => {
                Ok(json!([format!("{}", self.signer.address())]))
            }
            "eth_chainId" => Ok(json!(self.active_chain().chain_id)),
            "wallet_switchEthereumChain" => {
                let chain_id = params
                    .get(0)
                    .and_then(|p| p.get("chainId"))
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        ProviderError::invalid_params(
                            "wallet_switchEthereumChain expects [{chainId}]",
                        )
                    })?;
                self.switch_to(chain_id)
            }
            "wallet_addEthereumChain" => {
                let config: NetworkConfig = params
                    .get(0)
                    .cloned()
                    .ok_or_else(|| {
                        ProviderError::invalid_params(
                            "wallet_addEthereumChain expects a chain descriptor",
                        )
                    })
                    .and_then(|v| {
                        serde_json::from_value(v).map_err(|e| {
                            ProviderError::invalid_params(format!("bad chain descriptor: {e}"))
                        })
                    })?;
                self.add_chain(config)
            }
            "eth_getBalance" => self.fetch_balance(&params).await,
            other => Err(ProviderError::unsupported_method(other)),
        }
    }

    fn signer(&self) -> PrivateKeySigner {
        self.signer.clone()
    }

    fn active_chain(&self) -> NetworkConfig {
        let registry = self.registry.read().expect("chain registry poisoned");
        registry.chains[registry.active].clone()
    }

    fn subscribe_chain_changed(&self) -> watch::Receiver<String> {
        self.chain_tx.subscribe()
    }
}

/// Default location of the persisted chain registry:
/// ~/.config/will-tui/chains.json.
fn registry_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join(APP_DIR).join(CHAINS_FILE))
}

fn load_chains(path: &PathBuf) -> Vec<NetworkConfig> {
    let data = match fs::read_to_string(path) {
        Ok(d) => d,
        Err(_) => return Vec::new(),
    };
    serde_json::from_str(&data).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::chains::get_chain_config;

    fn wallet() -> SoftwareWallet {
        SoftwareWallet::with_registry_path(
            PrivateKeySigner::random(),
            get_chain_config("pharos").unwrap(),
            None,
        )
    }

    fn testnet_descriptor() -> Value {
        serde_json::to_value(get_chain_config("pharos-testnet").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_accounts_returns_signer_address() {
        let w = wallet();
        let expected = format!("{}", w.signer().address());
        let accounts = w.request("eth_requestAccounts", json!([])).await.unwrap();
        assert_eq!(accounts, json!([expected]));
    }

    #[tokio::test]
    async fn test_chain_id_starts_on_home() {
        let w = wallet();
        let id = w.request("eth_chainId", json!([])).await.unwrap();
        assert_eq!(id, json!("0xc352"));
    }

    #[tokio::test]
    async fn test_switch_to_unknown_chain_is_4902() {
        let w = wallet();
        let err = w
            .request("wallet_switchEthereumChain", json!([{"chainId": "0x1"}]))
            .await
            .unwrap_err();
        assert!(err.is_unrecognized_chain());
    }

    #[tokio::test]
    async fn test_add_then_switch() {
        let w = wallet();
        w.request("wallet_addEthereumChain", json!([testnet_descriptor()]))
            .await
            .unwrap();
        // add switches immediately
        assert_eq!(w.active_chain().chain_id, "0xc368");

        w.request("wallet_switchEthereumChain", json!([{"chainId": "0xc352"}]))
            .await
            .unwrap();
        assert_eq!(w.active_chain().chain_id, "0xc352");
        w.request("wallet_switchEthereumChain", json!([{"chainId": "0xc368"}]))
            .await
            .unwrap();
        assert_eq!(w.active_chain().chain_id, "0xc368");
    }

    #[tokio::test]
    async fn test_switch_accepts_decimal_representation() {
        let w = wallet();
        w.request("wallet_switchEthereumChain", json!([{"chainId": "50002"}]))
            .await
            .unwrap();
        assert_eq!(w.active_chain().chain_id, "0xc352");
    }

    #[tokio::test]
    async fn test_add_rejects_descriptor_without_rpc() {
        let w = wallet();
        let mut descriptor = testnet_descriptor();
        descriptor["rpcUrls"] = json!([]);
        let err = w
            .request("wallet_addEthereumChain", json!([descriptor]))
            .await
            .unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let w = wallet();
        let err = w.request("eth_signTypedData_v4", json!([])).await.unwrap_err();
        assert_eq!(err.code, crate::wallet::UNSUPPORTED_METHOD);
    }

    #[tokio::test]
    async fn test_chain_changed_notification() {
        let w = wallet();
        let rx = w.subscribe_chain_changed();
        assert_eq!(*rx.borrow(), "0xc352");
        w.request("wallet_addEthereumChain", json!([testnet_descriptor()]))
            .await
            .unwrap();
        assert_eq!(*rx.borrow(), "0xc368");
    }

    #[tokio::test]
    async fn test_registry_persists_added_chains() {
        let path = std::env::temp_dir().join(format!(
            "will-tui-registry-test-{}.json",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);

        let first = SoftwareWallet::with_registry_path(
            PrivateKeySigner::random(),
            get_chain_config("pharos").unwrap(),
            Some(path.clone()),
        );
        first
            .request("wallet_addEthereumChain", json!([testnet_descriptor()]))
            .await
            .unwrap();

        let second = SoftwareWallet::with_registry_path(
            PrivateKeySigner::random(),
            get_chain_config("pharos").unwrap(),
            Some(path.clone()),
        );
        second
            .request("wallet_switchEthereumChain", json!([{"chainId": "0xc368"}]))
            .await
            .expect("persisted chain should be known to a fresh wallet");

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_registry_path_shape() {
        if let Some(p) = registry_path() {
            assert!(p.to_string_lossy().contains("will-tui"));
            assert!(p.to_string_lossy().contains("chains.json"));
        }
    }
}
