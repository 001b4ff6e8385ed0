use std::sync::{Arc, RwLock};

use alloy::network::EthereumWallet;
use alloy::primitives::{Address, B256, U256};
use alloy::providers::{Provider, ProviderBuilder};
use serde_json::{Value, json};
use thiserror::Error;

use crate::data::chains::NetworkConfig;
use crate::data::contract::{self, SmartWill};
use crate::data::types::{BeneficiaryWill, MilestoneRelease, WillRecord};
use crate::utils;
use crate::wallet::{self, ProviderError, WalletProvider};

const POISONED: &str = "session state lock poisoned";

/// Connection state owned by the coordinator. The UI reads cloned
/// snapshots; every mutation goes through a coordinator entry point.
#[derive(Debug, Clone)]
pub struct Session {
    pub account: Option<Address>,
    /// Formatted native-currency balance of the connected account.
    pub balance: String,
    pub is_connected: bool,
    /// Hex chain id the wallet is on, once known.
    pub chain_id: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            account: None,
            balance: "0.0".to_string(),
            is_connected: false,
            chain_id: None,
            loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("wallet is not connected")]
    NotConnected,
    #[error("wrong network: please switch to {expected}")]
    WrongNetwork { expected: String },
    #[error("another operation is already in progress")]
    Busy,
    #[error(transparent)]
    Provider(#[from] ProviderError),
    #[error("{0}")]
    Call(String),
}

/// Clears the loading flag on every exit path of a tracked operation.
struct LoadingGuard<'a> {
    state: &'a RwLock<Session>,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut s) = self.state.write() {
            s.loading = false;
        }
    }
}

/// Coordinates wallet connection, network enforcement, and the lifecycle
/// of every contract call. All errors stop here: operations surface a
/// sentinel (false / None / empty) and record a human-readable message in
/// the session state instead of propagating.
///
/// Overlapping tracked operations are rejected: the loading flag doubles
/// as a single-flight latch.
pub struct SessionCoordinator {
    wallet: Arc<dyn WalletProvider>,
    target: NetworkConfig,
    contract_address: Address,
    state: RwLock<Session>,
}

impl SessionCoordinator {
    pub fn new(
        wallet: Arc<dyn WalletProvider>,
        target: NetworkConfig,
        contract_address: Address,
    ) -> Self {
        Self {
            wallet,
            target,
            contract_address,
            state: RwLock::new(Session::default()),
        }
    }

    pub fn target(&self) -> &NetworkConfig {
        &self.target
    }

    pub fn contract_address(&self) -> Address {
        self.contract_address
    }

    pub fn snapshot(&self) -> Session {
        self.state.read().expect(POISONED).clone()
    }

    /// Wallet `chainChanged` notifications, for the resync watcher.
    pub fn subscribe_chain_changed(&self) -> tokio::sync::watch::Receiver<String> {
        self.wallet.subscribe_chain_changed()
    }

    /// Connect the wallet: switch to the target chain (adding it if the
    /// wallet does not know it), authorize an account, then fetch chain id
    /// and balance concurrently and commit everything in one state write.
    pub async fn connect(&self) -> bool {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => return self.fail(e),
        };
        match self.try_connect().await {
            Ok(()) => true,
            Err(e) => {
                let mut s = self.state.write().expect(POISONED);
                s.error = Some(e.to_string());
                s.is_connected = false;
                false
            }
        }
    }

    async fn try_connect(&self) -> Result<(), SessionError> {
        self.try_switch().await?;

        let accounts = self.wallet.request("eth_requestAccounts", json!([])).await?;
        let account: Address = accounts
            .get(0)
            .and_then(Value::as_str)
            .ok_or_else(|| SessionError::Call("wallet returned no accounts".to_string()))?
            .parse()
            .map_err(|e| SessionError::Call(format!("wallet returned an invalid account: {e}")))?;

        let chain_fut = self.wallet.request("eth_chainId", json!([]));
        let balance_fut = self
            .wallet
            .request("eth_getBalance", json!([format!("{account}"), "latest"]));
        let (chain_id, balance) = tokio::try_join!(chain_fut, balance_fut)?;

        let chain_id = chain_id
            .as_str()
            .ok_or_else(|| SessionError::Call("wallet returned an invalid chain id".to_string()))?
            .to_string();
        if !wallet::same_chain(&chain_id, &self.target.chain_id) {
            return Err(SessionError::WrongNetwork {
                expected: self.target.chain_name.clone(),
            });
        }

        let balance_wei = parse_quantity(&balance)?;
        let mut s = self.state.write().expect(POISONED);
        s.account = Some(account);
        s.balance =
            utils::format_u256_as_decimal(balance_wei, self.target.native_currency.decimals);
        s.chain_id = Some(chain_id);
        s.is_connected = true;
        Ok(())
    }

    /// Ask the wallet to switch to the target chain. If the wallet reports
    /// the chain unknown (code 4902), issue exactly one add-chain request
    /// carrying the static descriptor. Errors are recorded, never thrown.
    pub async fn switch_network(&self) -> bool {
        match self.try_switch().await {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    async fn try_switch(&self) -> Result<(), SessionError> {
        let params = json!([{ "chainId": self.target.chain_id }]);
        match self
            .wallet
            .request("wallet_switchEthereumChain", params)
            .await
        {
            Ok(_) => {}
            Err(e) if e.is_unrecognized_chain() => {
                let descriptor = serde_json::to_value(&self.target).map_err(|e| {
                    SessionError::Call(format!("could not encode chain descriptor: {e}"))
                })?;
                self.wallet
                    .request("wallet_addEthereumChain", json!([descriptor]))
                    .await
                    .map_err(|e| {
                        SessionError::Call(format!(
                            "Failed to add {} to the wallet: {e}",
                            self.target.chain_name
                        ))
                    })?;
            }
            Err(e) => {
                return Err(SessionError::Call(format!(
                    "Failed to switch to {}: {e}",
                    self.target.chain_name
                )));
            }
        }

        let mut s = self.state.write().expect(POISONED);
        s.chain_id = Some(self.target.chain_id.clone());
        Ok(())
    }

    // --- Write operations ---

    /// Lock `amount` wei for `beneficiary`, claimable after `wait_time`
    /// seconds of owner silence. `on_hash` fires as soon as the
    /// transaction is submitted, before inclusion.
    pub async fn create_will(
        &self,
        beneficiary: Address,
        description: String,
        amount: U256,
        wait_time: U256,
        on_hash: impl FnOnce(B256) + Send,
    ) -> bool {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => return self.fail(e),
        };
        match self
            .try_create_will(beneficiary, description, amount, wait_time, on_hash)
            .await
        {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    async fn try_create_will(
        &self,
        beneficiary: Address,
        description: String,
        amount: U256,
        wait_time: U256,
        on_hash: impl FnOnce(B256) + Send,
    ) -> Result<(), SessionError> {
        self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let pending = will
            .createNormalWill(beneficiary, description, wait_time)
            .value(amount)
            .send()
            .await
            .map_err(|e| SessionError::Call(format!("Error creating will: {e}")))?;
        on_hash(*pending.tx_hash());
        pending
            .watch()
            .await
            .map_err(|e| SessionError::Call(format!("Error confirming will creation: {e}")))?;
        Ok(())
    }

    /// Add funds to the caller's existing will.
    pub async fn deposit_more(&self, amount: U256) -> bool {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => return self.fail(e),
        };
        match self.try_deposit(amount).await {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    async fn try_deposit(&self, amount: U256) -> Result<(), SessionError> {
        self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let pending = will
            .deposit()
            .value(amount)
            .send()
            .await
            .map_err(|e| SessionError::Call(format!("Error making deposit: {e}")))?;
        pending
            .watch()
            .await
            .map_err(|e| SessionError::Call(format!("Error confirming deposit: {e}")))?;
        Ok(())
    }

    /// Liveness heartbeat: proves the owner is active and resets the
    /// beneficiary claim timer.
    pub async fn ping(&self) -> bool {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => return self.fail(e),
        };
        match self.try_ping().await {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    async fn try_ping(&self) -> Result<(), SessionError> {
        self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let pending = will
            .ping()
            .send()
            .await
            .map_err(|e| SessionError::Call(format!("Error updating activity status: {e}")))?;
        pending
            .watch()
            .await
            .map_err(|e| SessionError::Call(format!("Error confirming ping: {e}")))?;
        Ok(())
    }

    /// Claim a matured will of `owner` as its beneficiary.
    pub async fn claim_will(&self, owner: Address) -> bool {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => return self.fail(e),
        };
        match self.try_claim_will(owner).await {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    async fn try_claim_will(&self, owner: Address) -> Result<(), SessionError> {
        self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let pending = will
            .claimNormalWill(owner)
            .send()
            .await
            .map_err(|e| SessionError::Call(format!("Error claiming will: {e}")))?;
        pending
            .watch()
            .await
            .map_err(|e| SessionError::Call(format!("Error confirming claim: {e}")))?;
        Ok(())
    }

    /// Claim one release of a milestone will of `owner`.
    pub async fn claim_milestone(
        &self,
        owner: Address,
        will_index: U256,
        release_index: U256,
    ) -> bool {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => return self.fail(e),
        };
        match self.try_claim_milestone(owner, will_index, release_index).await {
            Ok(()) => true,
            Err(e) => self.fail(e),
        }
    }

    async fn try_claim_milestone(
        &self,
        owner: Address,
        will_index: U256,
        release_index: U256,
    ) -> Result<(), SessionError> {
        self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let pending = will
            .claimMilestoneWill(owner, will_index, release_index)
            .send()
            .await
            .map_err(|e| SessionError::Call(format!("Error claiming milestone release: {e}")))?;
        pending
            .watch()
            .await
            .map_err(|e| SessionError::Call(format!("Error confirming milestone claim: {e}")))?;
        Ok(())
    }

    // --- Read operations ---

    /// Fetch the will owned by `owner`, if one exists.
    pub async fn get_will(&self, owner: Address) -> Option<WillRecord> {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => {
                self.fail(e);
                return None;
            }
        };
        match self.try_get_will(owner).await {
            Ok(record) => record,
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    async fn try_get_will(&self, owner: Address) -> Result<Option<WillRecord>, SessionError> {
        self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let raw = will
            .normalWills(owner)
            .call()
            .await
            .map_err(|e| SessionError::Call(format!("Error fetching will details: {e}")))?;
        Ok(contract::decode_will(owner, raw))
    }

    /// Whether the connected account has created a will. Deliberately
    /// lighter than the guarded pattern: no loading toggle, no error
    /// recording; any failure reads as "no".
    pub async fn has_created_will(&self) -> bool {
        self.try_has_created_will().await.unwrap_or(false)
    }

    async fn try_has_created_will(&self) -> Result<bool, SessionError> {
        let account = self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let raw = will
            .hasNormalWill(account)
            .call()
            .await
            .map_err(|e| SessionError::Call(format!("Error checking will existence: {e}")))?;
        Ok(raw.exists)
    }

    /// Wills in which the connected account is the beneficiary.
    pub async fn wills_as_beneficiary(&self) -> Vec<BeneficiaryWill> {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => {
                self.fail(e);
                return Vec::new();
            }
        };
        match self.try_wills_as_beneficiary().await {
            Ok(wills) => wills,
            Err(e) => {
                self.fail(e);
                Vec::new()
            }
        }
    }

    async fn try_wills_as_beneficiary(&self) -> Result<Vec<BeneficiaryWill>, SessionError> {
        let account = self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let raw = will
            .getNormalWillAsBeneficiary(account)
            .call()
            .await
            .map_err(|e| SessionError::Call(format!("Error fetching beneficiary wills: {e}")))?;
        Ok(contract::map_beneficiary_wills(raw.owners, raw.amounts))
    }

    /// Claimable milestone releases in which the connected account is the
    /// beneficiary.
    pub async fn milestone_wills_as_beneficiary(&self) -> Vec<MilestoneRelease> {
        let _guard = match self.begin_op() {
            Ok(g) => g,
            Err(e) => {
                self.fail(e);
                return Vec::new();
            }
        };
        match self.try_milestone_wills_as_beneficiary().await {
            Ok(releases) => releases,
            Err(e) => {
                self.fail(e);
                Vec::new()
            }
        }
    }

    async fn try_milestone_wills_as_beneficiary(
        &self,
    ) -> Result<Vec<MilestoneRelease>, SessionError> {
        let account = self.ensure_ready().await?;
        let provider = self.signer_provider()?;
        let will = SmartWill::new(self.contract_address, provider);
        let raw = will
            .getMilestoneWillsAsBeneficiary(account)
            .call()
            .await
            .map_err(|e| SessionError::Call(format!("Error fetching milestone wills: {e}")))?;
        Ok(contract::map_milestone_releases(
            raw.owners,
            raw.willIndexes,
            raw.releaseIndexes,
            raw.releaseAmounts,
        ))
    }

    // --- State maintenance ---

    /// Re-read the connected account's balance. Used after confirmed
    /// writes and on resync; not loading-tracked.
    pub async fn refresh_balance(&self) -> bool {
        let Some(account) = self.snapshot().account else {
            return false;
        };
        let response = self
            .wallet
            .request("eth_getBalance", json!([format!("{account}"), "latest"]))
            .await;
        match response.map_err(SessionError::from).and_then(|v| parse_quantity(&v)) {
            Ok(wei) => {
                let mut s = self.state.write().expect(POISONED);
                s.balance =
                    utils::format_u256_as_decimal(wei, self.target.native_currency.decimals);
                true
            }
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Invalidate-and-resync entry point for wallet `chainChanged`
    /// notifications: record the new chain and recompute connectivity.
    /// The app triggers data refreshes when the new chain is the target.
    pub fn handle_chain_changed(&self, chain_id: String) {
        let on_target = wallet::same_chain(&chain_id, &self.target.chain_id);
        let mut s = self.state.write().expect(POISONED);
        s.chain_id = Some(chain_id);
        if s.account.is_some() {
            s.is_connected = on_target;
            if !on_target {
                s.error = Some(format!(
                    "Wallet left {}; switch back to continue",
                    self.target.chain_name
                ));
            }
        }
    }

    /// Clear the shared error, e.g. when the user navigates.
    pub fn clear_error(&self) {
        let mut s = self.state.write().expect(POISONED);
        s.error = None;
    }

    // --- Guarded-call plumbing ---

    /// Single-flight latch: marks the session loading, clears the previous
    /// error, and refuses to start while another tracked operation runs.
    fn begin_op(&self) -> Result<LoadingGuard<'_>, SessionError> {
        let mut s = self.state.write().expect(POISONED);
        if s.loading {
            return Err(SessionError::Busy);
        }
        s.loading = true;
        s.error = None;
        Ok(LoadingGuard { state: &self.state })
    }

    /// Preconditions shared by every contract call: an account must be
    /// authorized, and the wallet must sit on the target chain — with one
    /// automatic switch attempt before giving up.
    async fn ensure_ready(&self) -> Result<Address, SessionError> {
        let (account, chain_id) = {
            let s = self.state.read().expect(POISONED);
            (s.account, s.chain_id.clone())
        };
        let account = account.ok_or(SessionError::NotConnected)?;
        let on_target = chain_id
            .as_deref()
            .is_some_and(|id| wallet::same_chain(id, &self.target.chain_id));
        if !on_target {
            self.try_switch()
                .await
                .map_err(|_| SessionError::WrongNetwork {
                    expected: self.target.chain_name.clone(),
                })?;
        }
        Ok(account)
    }

    /// Fresh provider bound to the wallet's signer on its active chain.
    /// Built per call so a handle never outlives a chain switch.
    fn signer_provider(&self) -> Result<impl Provider + use<>, SessionError> {
        let url = self
            .wallet
            .active_chain()
            .primary_rpc()
            .parse()
            .map_err(|e| SessionError::Call(format!("invalid rpc url: {e}")))?;
        let signer_wallet = EthereumWallet::from(self.wallet.signer());
        Ok(ProviderBuilder::new().wallet(signer_wallet).on_http(url))
    }

    fn fail(&self, e: SessionError) -> bool {
        let mut s = self.state.write().expect(POISONED);
        s.error = Some(e.to_string());
        false
    }
}

/// Parse a JSON-RPC quantity ("0x..." hex or decimal string) into U256.
fn parse_quantity(value: &Value) -> Result<U256, SessionError> {
    let s = value
        .as_str()
        .ok_or_else(|| SessionError::Call("wallet returned a non-string quantity".to_string()))?
        .trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(s, 10),
    };
    parsed.map_err(|e| SessionError::Call(format!("invalid quantity {s:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::chains::get_chain_config;
    use alloy::signers::local::PrivateKeySigner;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::watch;

    /// Scripted wallet for coordinator tests: fixed responses per method,
    /// plus a call log to assert on traffic.
    struct MockWallet {
        signer: PrivateKeySigner,
        chain: NetworkConfig,
        chain_id_response: String,
        accounts: Vec<String>,
        balance_hex: String,
        switch_error: Option<ProviderError>,
        add_error: Option<ProviderError>,
        delay: Option<Duration>,
        calls: Mutex<Vec<String>>,
        chain_tx: watch::Sender<String>,
    }

    impl MockWallet {
        fn new() -> Self {
            let signer = PrivateKeySigner::random();
            let chain = get_chain_config("pharos").unwrap();
            let account = format!("{}", signer.address());
            let (chain_tx, _) = watch::channel(chain.chain_id.clone());
            Self {
                signer,
                chain_id_response: chain.chain_id.clone(),
                chain,
                accounts: vec![account],
                // 1 ether
                balance_hex: "0xde0b6b3a7640000".to_string(),
                switch_error: None,
                add_error: None,
                delay: None,
                calls: Mutex::new(Vec::new()),
                chain_tx,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WalletProvider for MockWallet {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderError> {
            self.calls.lock().unwrap().push(method.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match method {
                "wallet_switchEthereumChain" => match &self.switch_error {
                    Some(e) => Err(e.clone()),
                    None => Ok(Value::Null),
                },
                "wallet_addEthereumChain" => match &self.add_error {
                    Some(e) => Err(e.clone()),
                    None => Ok(Value::Null),
                },
                "eth_requestAccounts" | "eth_accounts" => Ok(json!(self.accounts)),
                "eth_chainId" => Ok(json!(self.chain_id_response)),
                "eth_getBalance" => Ok(json!(self.balance_hex)),
                other => Err(ProviderError::unsupported_method(other)),
            }
        }

        fn signer(&self) -> PrivateKeySigner {
            self.signer.clone()
        }

        fn active_chain(&self) -> NetworkConfig {
            self.chain.clone()
        }

        fn subscribe_chain_changed(&self) -> watch::Receiver<String> {
            self.chain_tx.subscribe()
        }
    }

    fn coordinator(mock: MockWallet) -> (Arc<SessionCoordinator>, Arc<MockWallet>) {
        let wallet = Arc::new(mock);
        let target = get_chain_config("pharos").unwrap();
        let contract = Address::from_slice(&[0x05; 20]);
        (
            Arc::new(SessionCoordinator::new(wallet.clone(), target, contract)),
            wallet,
        )
    }

    #[tokio::test]
    async fn test_write_without_account_fails_with_zero_wallet_calls() {
        let (c, wallet) = coordinator(MockWallet::new());
        assert!(!c.ping().await);
        assert!(wallet.calls().is_empty());
        let s = c.snapshot();
        assert_eq!(s.error.as_deref(), Some("wallet is not connected"));
        assert!(!s.loading);
    }

    #[tokio::test]
    async fn test_every_sentinel_shape_when_not_connected() {
        let (c, wallet) = coordinator(MockWallet::new());
        let owner = Address::from_slice(&[0x07; 20]);
        assert!(!c.deposit_more(U256::from(1u64)).await);
        assert!(!c.claim_will(owner).await);
        assert!(
            !c.claim_milestone(owner, U256::from(0u64), U256::from(0u64))
                .await
        );
        assert!(c.get_will(owner).await.is_none());
        assert!(c.wills_as_beneficiary().await.is_empty());
        assert!(c.milestone_wills_as_beneficiary().await.is_empty());
        assert!(
            !c.create_will(owner, "d".into(), U256::from(1u64), U256::from(1u64), |_| {})
                .await
        );
        assert!(wallet.calls().is_empty());
    }

    #[tokio::test]
    async fn test_has_created_will_stays_silent_when_not_connected() {
        let (c, wallet) = coordinator(MockWallet::new());
        assert!(!c.has_created_will().await);
        assert!(wallet.calls().is_empty());
        // lighter lifecycle: no error recorded
        assert!(c.snapshot().error.is_none());
    }

    #[tokio::test]
    async fn test_switch_unknown_chain_issues_one_add_request() {
        let mut mock = MockWallet::new();
        mock.switch_error = Some(ProviderError::unrecognized_chain("0xc352"));
        let (c, wallet) = coordinator(mock);
        assert!(c.switch_network().await);
        assert_eq!(
            wallet.calls(),
            vec!["wallet_switchEthereumChain", "wallet_addEthereumChain"]
        );
    }

    #[tokio::test]
    async fn test_switch_gives_up_after_failed_add() {
        let mut mock = MockWallet::new();
        mock.switch_error = Some(ProviderError::unrecognized_chain("0xc352"));
        mock.add_error = Some(ProviderError::new(crate::wallet::USER_REJECTED, "rejected"));
        let (c, wallet) = coordinator(mock);
        assert!(!c.switch_network().await);
        // exactly one add-chain attempt, no retry loop
        assert_eq!(
            wallet.calls(),
            vec!["wallet_switchEthereumChain", "wallet_addEthereumChain"]
        );
        assert!(c.snapshot().error.unwrap().contains("Failed to add"));
    }

    #[tokio::test]
    async fn test_switch_rejection_without_4902_does_not_add() {
        let mut mock = MockWallet::new();
        mock.switch_error = Some(ProviderError::new(crate::wallet::USER_REJECTED, "rejected"));
        let (c, wallet) = coordinator(mock);
        assert!(!c.switch_network().await);
        assert_eq!(wallet.calls(), vec!["wallet_switchEthereumChain"]);
    }

    #[tokio::test]
    async fn test_connect_happy_path() {
        let (c, wallet) = coordinator(MockWallet::new());
        assert!(c.connect().await);
        let s = c.snapshot();
        assert!(s.is_connected);
        assert_eq!(s.account, Some(wallet.signer().address()));
        assert_eq!(s.balance, "1.0");
        assert_eq!(s.chain_id.as_deref(), Some("0xc352"));
        assert!(s.error.is_none());
        assert!(!s.loading);
    }

    #[tokio::test]
    async fn test_connect_wrong_network_after_switch() {
        let mut mock = MockWallet::new();
        // switch "succeeds" but the wallet still reports another chain
        mock.chain_id_response = "0x1".to_string();
        let (c, _) = coordinator(mock);
        assert!(!c.connect().await);
        let s = c.snapshot();
        assert!(!s.is_connected);
        assert!(s.account.is_none());
        assert!(s.error.unwrap().contains("Pharos Devnet"));
        assert!(!s.loading);
    }

    #[tokio::test]
    async fn test_connect_failure_restores_loading() {
        let mut mock = MockWallet::new();
        mock.accounts = vec![];
        let (c, _) = coordinator(mock);
        assert!(!c.connect().await);
        let s = c.snapshot();
        assert!(!s.loading);
        assert_eq!(s.error.as_deref(), Some("wallet returned no accounts"));
    }

    #[tokio::test]
    async fn test_overlapping_operations_are_rejected() {
        let mut mock = MockWallet::new();
        mock.delay = Some(Duration::from_millis(100));
        let (c, _) = coordinator(mock);

        let background = {
            let c = c.clone();
            tokio::spawn(async move { c.connect().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!c.ping().await);
        assert_eq!(
            c.snapshot().error.as_deref(),
            Some("another operation is already in progress")
        );

        assert!(background.await.unwrap());
        assert!(!c.snapshot().loading);
    }

    #[tokio::test]
    async fn test_chain_changed_invalidates_connection() {
        let (c, _) = coordinator(MockWallet::new());
        assert!(c.connect().await);

        c.handle_chain_changed("0x1".to_string());
        let s = c.snapshot();
        assert_eq!(s.chain_id.as_deref(), Some("0x1"));
        assert!(!s.is_connected);
        assert!(s.error.is_some());

        c.handle_chain_changed("0xc352".to_string());
        assert!(c.snapshot().is_connected);
    }

    #[tokio::test]
    async fn test_chain_changed_before_connect_only_tracks_chain() {
        let (c, _) = coordinator(MockWallet::new());
        c.handle_chain_changed("0x1".to_string());
        let s = c.snapshot();
        assert_eq!(s.chain_id.as_deref(), Some("0x1"));
        assert!(!s.is_connected);
        assert!(s.error.is_none());
    }

    #[tokio::test]
    async fn test_refresh_balance_without_account() {
        let (c, wallet) = coordinator(MockWallet::new());
        assert!(!c.refresh_balance().await);
        assert!(wallet.calls().is_empty());
    }

    #[test]
    fn test_default_session() {
        let s = Session::default();
        assert!(s.account.is_none());
        assert_eq!(s.balance, "0.0");
        assert!(!s.is_connected);
        assert!(!s.loading);
        assert!(s.error.is_none());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(
            parse_quantity(&json!("0xde0b6b3a7640000")).unwrap(),
            U256::from(10u64).pow(U256::from(18u64))
        );
        assert_eq!(parse_quantity(&json!("42")).unwrap(), U256::from(42u64));
        assert!(parse_quantity(&json!(7)).is_err());
        assert!(parse_quantity(&json!("0xzz")).is_err());
    }

}
