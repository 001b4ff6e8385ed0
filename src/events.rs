use alloy::primitives::{Address, B256, U256};

use crate::data::types::{BeneficiaryWill, MilestoneRelease, WillRecord};
use crate::session::Session;

/// Views the user can navigate to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Dashboard,
    CreateWill,
    Deposit,
    BeneficiaryWills,
    MilestoneWills,
}

/// Events sent from background operation tasks to the main app loop
#[derive(Debug)]
pub enum AppEvent {
    /// Fresh snapshot of the coordinator's session state. Sent after every
    /// operation; carries loading/error for the status bar.
    SessionUpdated(Session),

    // Data loaded
    WillLoaded(Option<WillRecord>),
    HasWill(bool),
    BeneficiaryWillsLoaded(Vec<BeneficiaryWill>),
    MilestoneWillsLoaded(Vec<MilestoneRelease>),

    // Transactions
    TxSubmitted(B256),
    WillCreated(bool),
    DepositCompleted(bool),
    PingCompleted(bool),
    WillClaimCompleted { owner: Address, ok: bool },
    MilestoneClaimCompleted { owner: Address, ok: bool },

    // Wallet
    ChainChanged(String),

    // Export
    ExportComplete(String),

    // User intents emitted by components
    PingRequested,
    RefreshRequested,
    CreateWillSubmitted {
        beneficiary: Address,
        description: String,
        amount: U256,
        wait_time: U256,
    },
    DepositSubmitted(U256),
    ClaimWillRequested(Address),
    ClaimMilestoneRequested {
        owner: Address,
        will_index: U256,
        release_index: U256,
    },
    ExportRequested,

    // Navigation
    Navigate(View),

    // Status
    Error(String),
}
