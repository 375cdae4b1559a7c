use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use sybil_checker::analysis::select_candidates;
use sybil_checker::auditor::Auditor;
use sybil_checker::config::{
    Config, DEFAULT_CALL_DELAY_MS, DEFAULT_MAX_TXS_PER_WALLET, DEFAULT_SYBIL_THRESHOLD,
};
use sybil_checker::error::AuditError;
use sybil_checker::etherscan::{ETHERSCAN_API, EtherscanClient};
use sybil_checker::report::OutputFormat;
use sybil_checker::report::formatters::{format_interrupted, format_sybil_candidates};
use sybil_checker::report::writer::save_reports;
use sybil_checker::wallets::read_wallets;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "checker")]
#[command(about = "Wallet interrupted-transaction & sybil checker", long_about = None)]
struct Cli {
    /// Text file with one wallet address per line
    #[arg(short, long, default_value = "wallets.txt")]
    wallets: PathBuf,

    /// Etherscan API key (or set ETHERSCAN_API_KEY)
    #[arg(short = 'k', long)]
    apikey: Option<String>,

    /// Minimum number of distinct input wallets a counterparty must touch
    /// to be flagged as a potential sybil
    #[arg(long, default_value_t = DEFAULT_SYBIL_THRESHOLD)]
    sybil_threshold: usize,

    /// Maximum transactions fetched per wallet
    #[arg(long, default_value_t = DEFAULT_MAX_TXS_PER_WALLET)]
    max_txs: u32,

    /// Pause between API calls, in milliseconds
    #[arg(long, default_value_t = DEFAULT_CALL_DELAY_MS)]
    delay_ms: u64,

    /// Directory the CSV reports are written to
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    #[arg(short, long, default_value = "table")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let cli = Cli::parse();
    let format = OutputFormat::from(cli.format.as_str());

    let config = Config::resolve(
        cli.wallets,
        cli.apikey,
        cli.sybil_threshold,
        cli.max_txs,
        cli.delay_ms,
        cli.output_dir,
    )?;

    let wallets = read_wallets(&config.wallets_path)?;
    if wallets.is_empty() {
        return Err(AuditError::InvalidConfiguration(format!(
            "no wallets found in {}",
            config.wallets_path.display()
        ))
        .into());
    }

    info!("Loaded {} wallets. Querying Etherscan...", wallets.len());

    let client = EtherscanClient::new(ETHERSCAN_API, &config.api_key)?;
    let auditor = Auditor::new(client, config.max_txs_per_wallet, config.call_delay);

    let (outcome, failed_wallets) = auditor.run(&wallets).await;
    if failed_wallets > 0 {
        warn!(
            "{} wallet(s) could not be fetched; their ledgers were treated as empty",
            failed_wallets
        );
    }

    for wallet in &wallets {
        let interrupted = outcome.interrupted_for(wallet);
        println!(
            "\nWallet: {wallet} -> interrupted/failed txs: {}",
            interrupted.len()
        );
        if !interrupted.is_empty() {
            println!("{}", format_interrupted(interrupted, &format));
        }
    }

    let candidates = select_candidates(&outcome.counterparties, config.sybil_threshold)?;
    if candidates.is_empty() {
        println!("\nNo potential sybil addresses found with the given threshold.");
    } else {
        println!(
            "\nPotential sybil addresses (interacted with >= {} input wallets):",
            config.sybil_threshold
        );
        println!("{}", format_sybil_candidates(&candidates, &format));
    }

    save_reports(&outcome, &candidates, &config.output_dir)?;

    Ok(())
}
