mod app;
mod components;
mod config;
mod data;
mod events;
mod session;
mod theme;
mod utils;
mod wallet;

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;

use crate::app::App;
use crate::config::Config;
use crate::data::{WillService, chains};
use crate::session::SessionCoordinator;
use crate::wallet::software::SoftwareWallet;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();

    // Resolve the target network, with an optional RPC override
    let mut network = chains::get_chain_config(&config.chain).ok_or_else(|| {
        eyre!(
            "Unknown chain '{}'; supported: {}",
            config.chain,
            chains::supported_chains().join(", ")
        )
    })?;
    if let Some(ref rpc_url) = config.rpc_url {
        network.rpc_urls = vec![rpc_url.clone()];
    }

    let contract: Address = config
        .contract
        .parse()
        .map_err(|e| eyre!("Invalid contract address '{}': {e}", config.contract))?;

    // The signing key is this client's wallet; without one there is
    // nothing to connect. Point the user at setup docs instead of failing
    // with a stack trace.
    let Some(ref key) = config.private_key else {
        eprintln!("No signing key configured.");
        eprintln!("Set WILL_TUI_PRIVATE_KEY or pass --private-key.");
        eprintln!(
            "To set up an account and fund it, see {}",
            wallet::WALLET_SETUP_URL
        );
        std::process::exit(1);
    };
    let signer: PrivateKeySigner = key
        .trim()
        .trim_start_matches("0x")
        .parse()
        .map_err(|e| eyre!("Invalid private key: {e}"))?;

    eprintln!(
        "Using account {} on {} (contract {contract})",
        signer.address(),
        network.chain_name
    );

    let software_wallet = Arc::new(SoftwareWallet::new(signer, network.clone()));
    let session = Arc::new(SessionCoordinator::new(
        software_wallet,
        network.clone(),
        contract,
    ));

    // Create event channel
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let service = Arc::new(WillService::new(session, event_tx));

    // Create app
    let mut app = App::with_service(service, event_rx, config.tick_rate_ms);
    app.set_chain_info(
        network.chain_name.clone(),
        network.native_currency.symbol.clone(),
    );

    // Initialize terminal
    let terminal = ratatui::init();
    let result = app.run(terminal).await;

    // Restore terminal
    ratatui::restore();

    result
}
