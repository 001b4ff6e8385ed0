pub mod chains;
pub mod contract;
pub mod export;
pub mod types;

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use tokio::sync::mpsc;

use crate::data::types::{BeneficiaryWill, MilestoneRelease};
use crate::events::AppEvent;
use crate::session::SessionCoordinator;

/// Bridges the UI to the session coordinator: every user action becomes
/// one spawned task that runs the operation and reports back over the
/// event channel. Failure details ride along in the session snapshot.
pub struct WillService {
    session: Arc<SessionCoordinator>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl WillService {
    pub fn new(
        session: Arc<SessionCoordinator>,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self { session, event_tx }
    }

    pub fn session(&self) -> &Arc<SessionCoordinator> {
        &self.session
    }

    /// Connect the wallet, then pull the dashboard data for the new
    /// account.
    pub fn connect_wallet(&self) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let ok = session.connect().await;
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
            if !ok {
                return;
            }

            let has_will = session.has_created_will().await;
            let _ = tx.send(AppEvent::HasWill(has_will));
            if let Some(account) = session.snapshot().account {
                let will = session.get_will(account).await;
                let _ = tx.send(AppEvent::WillLoaded(will));
            }
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    /// Re-read balance and the connected account's own will.
    pub fn refresh_dashboard(&self) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let Some(account) = session.snapshot().account else {
                return;
            };
            session.refresh_balance().await;
            let has_will = session.has_created_will().await;
            let _ = tx.send(AppEvent::HasWill(has_will));
            let will = session.get_will(account).await;
            let _ = tx.send(AppEvent::WillLoaded(will));
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    pub fn submit_create_will(
        &self,
        beneficiary: Address,
        description: String,
        amount: U256,
        wait_time: U256,
    ) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let hash_tx = tx.clone();
            let ok = session
                .create_will(beneficiary, description, amount, wait_time, move |hash| {
                    let _ = hash_tx.send(AppEvent::TxSubmitted(hash));
                })
                .await;
            if ok {
                session.refresh_balance().await;
            }
            let _ = tx.send(AppEvent::WillCreated(ok));
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    pub fn submit_deposit(&self, amount: U256) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let ok = session.deposit_more(amount).await;
            if ok {
                session.refresh_balance().await;
            }
            let _ = tx.send(AppEvent::DepositCompleted(ok));
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    pub fn ping(&self) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let ok = session.ping().await;
            let _ = tx.send(AppEvent::PingCompleted(ok));
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    pub fn claim_will(&self, owner: Address) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let ok = session.claim_will(owner).await;
            if ok {
                session.refresh_balance().await;
            }
            let _ = tx.send(AppEvent::WillClaimCompleted { owner, ok });
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    pub fn claim_milestone(&self, owner: Address, will_index: U256, release_index: U256) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let ok = session
                .claim_milestone(owner, will_index, release_index)
                .await;
            if ok {
                session.refresh_balance().await;
            }
            let _ = tx.send(AppEvent::MilestoneClaimCompleted { owner, ok });
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    pub fn refresh_beneficiary_wills(&self) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let wills = session.wills_as_beneficiary().await;
            let _ = tx.send(AppEvent::BeneficiaryWillsLoaded(wills));
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    pub fn refresh_milestone_wills(&self) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let releases = session.milestone_wills_as_beneficiary().await;
            let _ = tx.send(AppEvent::MilestoneWillsLoaded(releases));
            let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
        });
    }

    /// Write the currently loaded claimables to a CSV file.
    pub fn export_claimables(
        &self,
        wills: Vec<BeneficiaryWill>,
        releases: Vec<MilestoneRelease>,
        path: String,
    ) {
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match export::export_claimables_csv(&wills, &releases, &path) {
                Ok(message) => {
                    let _ = tx.send(AppEvent::ExportComplete(message));
                }
                Err(e) => {
                    let _ = tx.send(AppEvent::Error(e));
                }
            }
        });
    }

    /// Forward wallet chain changes into the event loop, invalidating the
    /// session instead of restarting the process.
    pub fn watch_chain_changes(&self) {
        let session = Arc::clone(&self.session);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let mut rx = session.subscribe_chain_changed();
            while rx.changed().await.is_ok() {
                let chain_id = rx.borrow_and_update().clone();
                session.handle_chain_changed(chain_id.clone());
                let _ = tx.send(AppEvent::ChainChanged(chain_id));
                let _ = tx.send(AppEvent::SessionUpdated(session.snapshot()));
            }
        });
    }
}
