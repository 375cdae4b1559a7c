use crate::analysis::SybilCandidate;
use crate::auditor::AuditOutcome;
use anyhow::{Context, Result};
use csv::Writer;
use std::path::Path;
use tracing::info;

pub const ALL_TXS_FILE: &str = "all_txs.csv";
pub const INTERRUPTED_FILE: &str = "interrupted_transactions.csv";
pub const SYBIL_FILE: &str = "potential_sybil_addresses.csv";

/// Writes the three report files. Called once at the end of a successful
/// run; each file is written whole.
pub fn save_reports(
    outcome: &AuditOutcome,
    candidates: &[SybilCandidate],
    outdir: &Path,
) -> Result<()> {
    std::fs::create_dir_all(outdir)
        .with_context(|| format!("Failed to create output directory {}", outdir.display()))?;

    write_all_transactions(outcome, &outdir.join(ALL_TXS_FILE))?;
    write_interrupted(outcome, &outdir.join(INTERRUPTED_FILE))?;
    write_sybil_candidates(candidates, &outdir.join(SYBIL_FILE))?;

    info!("Saved reports to {}/", outdir.display());
    Ok(())
}

fn write_all_transactions(outcome: &AuditOutcome, path: &Path) -> Result<()> {
    let mut wtr = csv_writer(path)?;

    wtr.write_record([
        "wallet",
        "hash",
        "from",
        "to",
        "value_eth",
        "gas",
        "gasPrice",
        "isError",
        "txreceipt_status",
        "blockNumber",
        "timeStamp",
    ])?;

    for tx in &outcome.transactions {
        wtr.write_record([
            &tx.wallet,
            &tx.hash,
            &tx.from,
            &tx.to,
            &tx.value_eth.to_string(),
            &tx.gas,
            &tx.gas_price,
            &tx.is_error,
            &tx.receipt_status,
            &tx.block_number,
            &tx.time_stamp,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn write_interrupted(outcome: &AuditOutcome, path: &Path) -> Result<()> {
    let mut wtr = csv_writer(path)?;

    wtr.write_record([
        "wallet",
        "hash",
        "from",
        "to",
        "value_eth",
        "isError",
        "txreceipt_status",
        "blockNumber",
        "timeStamp",
    ])?;

    // Wallets in sorted order; each wallet's rows keep fetch order.
    for (wallet, transactions) in &outcome.interrupted {
        for tx in transactions {
            wtr.write_record([
                wallet,
                &tx.hash,
                &tx.from,
                &tx.to,
                &tx.value_eth.to_string(),
                &tx.is_error,
                &tx.receipt_status,
                &tx.block_number,
                &tx.time_stamp,
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_sybil_candidates(candidates: &[SybilCandidate], path: &Path) -> Result<()> {
    let mut wtr = csv_writer(path)?;

    wtr.write_record(["address", "wallet_count", "wallets"])?;

    for candidate in candidates {
        wtr.write_record([
            &candidate.address,
            &candidate.wallet_count.to_string(),
            &candidate.wallets,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

fn csv_writer(path: &Path) -> Result<Writer<std::fs::File>> {
    Writer::from_path(path).with_context(|| format!("Failed to write {}", path.display()))
}
