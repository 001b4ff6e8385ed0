use clap::Parser;

use crate::data::chains;

#[derive(Parser, Debug)]
#[command(name = "will-tui", about = "Terminal client for the SmartWill inheritance contract")]
pub struct Config {
    /// Chain preset (pharos, pharos-testnet)
    #[arg(long, default_value = "pharos")]
    pub chain: String,

    /// Override the preset's RPC endpoint URL
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// Address of the deployed SmartWill contract
    #[arg(long, env = "SMARTWILL_CONTRACT", default_value = chains::DEFAULT_CONTRACT)]
    pub contract: String,

    /// Hex private key of the signing account
    #[arg(long, env = "WILL_TUI_PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,
}
