use crate::analysis::{SybilCandidate, Transaction};
use comfy_table::{Cell, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};
use csv::Writer;
use serde_json::json;

#[derive(Debug, Clone)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Table,
        }
    }
}

/// Renders a wallet's interrupted transactions with the summary column set
/// (hash, endpoints, value and the two failure flags).
pub fn format_interrupted(transactions: &[Transaction], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_interrupted_table(transactions),
        OutputFormat::Json => format_interrupted_json(transactions),
        OutputFormat::Csv => format_interrupted_csv(transactions),
    }
}

fn format_interrupted_table(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No interrupted transactions.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            "Hash",
            "From",
            "To",
            "Value (ETH)",
            "isError",
            "txreceipt_status",
        ]);

    for tx in transactions {
        table.add_row(vec![
            Cell::new(shorten_hash(&tx.hash)),
            Cell::new(&tx.from),
            Cell::new(&tx.to),
            Cell::new(tx.value_eth),
            Cell::new(&tx.is_error),
            Cell::new(&tx.receipt_status),
        ]);
    }

    table.to_string()
}

fn format_interrupted_json(transactions: &[Transaction]) -> String {
    let rows: Vec<_> = transactions
        .iter()
        .map(|tx| {
            json!({
                "wallet": tx.wallet,
                "hash": tx.hash,
                "from": tx.from,
                "to": tx.to,
                "value_eth": tx.value_eth,
                "isError": tx.is_error,
                "txreceipt_status": tx.receipt_status,
            })
        })
        .collect();

    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}

fn format_interrupted_csv(transactions: &[Transaction]) -> String {
    let mut wtr = Writer::from_writer(vec![]);

    let _ = wtr.write_record([
        "wallet",
        "hash",
        "from",
        "to",
        "value_eth",
        "isError",
        "txreceipt_status",
    ]);

    for tx in transactions {
        let _ = wtr.write_record([
            &tx.wallet,
            &tx.hash,
            &tx.from,
            &tx.to,
            &tx.value_eth.to_string(),
            &tx.is_error,
            &tx.receipt_status,
        ]);
    }

    String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
}

pub fn format_sybil_candidates(candidates: &[SybilCandidate], format: &OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_sybil_table(candidates),
        OutputFormat::Json => format_sybil_json(candidates),
        OutputFormat::Csv => format_sybil_csv(candidates),
    }
}

fn format_sybil_table(candidates: &[SybilCandidate]) -> String {
    if candidates.is_empty() {
        return "No potential sybil addresses found.".to_string();
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Address", "Wallet Count", "Wallets"]);

    for candidate in candidates {
        table.add_row(vec![
            Cell::new(&candidate.address),
            Cell::new(candidate.wallet_count),
            Cell::new(&candidate.wallets),
        ]);
    }

    table.to_string()
}

fn format_sybil_json(candidates: &[SybilCandidate]) -> String {
    serde_json::to_string_pretty(candidates).unwrap_or_else(|_| "[]".to_string())
}

fn format_sybil_csv(candidates: &[SybilCandidate]) -> String {
    let mut wtr = Writer::from_writer(vec![]);

    let _ = wtr.write_record(["address", "wallet_count", "wallets"]);

    for candidate in candidates {
        let _ = wtr.write_record([
            &candidate.address,
            &candidate.wallet_count.to_string(),
            &candidate.wallets,
        ]);
    }

    String::from_utf8(wtr.into_inner().unwrap_or_default()).unwrap_or_default()
}

fn shorten_hash(hash: &str) -> String {
    if hash.len() > 12 {
        format!("{}...{}", &hash[..6], &hash[hash.len() - 4..])
    } else {
        hash.to_string()
    }
}
