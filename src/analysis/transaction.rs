use crate::etherscan::RawTxRecord;
use serde::Serialize;

const WEI_PER_ETH: f64 = 1e18;

/// A normalized transaction, tied to the input wallet it was fetched for.
///
/// Scalar chain fields are carried through as the strings the API returned;
/// only `value` is converted (wei to ETH) because the reports display it.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub wallet: String,
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value_eth: f64,
    pub gas: String,
    pub gas_price: String,
    pub is_error: String,
    pub receipt_status: String,
    pub block_number: String,
    pub time_stamp: String,
}

impl Transaction {
    /// Normalizes one raw record. Missing fields arrive as empty strings
    /// (serde defaults on [`RawTxRecord`]) and an unparseable value becomes
    /// zero; malformed remote data must never abort a run.
    pub fn from_raw(wallet: &str, raw: RawTxRecord) -> Self {
        Transaction {
            wallet: wallet.to_lowercase(),
            hash: raw.hash,
            from: raw.from,
            to: raw.to,
            value_eth: wei_to_eth(&raw.value),
            gas: raw.gas,
            gas_price: raw.gas_price,
            is_error: raw.is_error,
            receipt_status: raw.txreceipt_status,
            block_number: raw.block_number,
            time_stamp: raw.time_stamp,
        }
    }

    /// A transaction is interrupted when it failed at the EVM level
    /// (`isError == "1"`) or its receipt recorded failure
    /// (`txreceipt_status == "0"`). Both fields empty means not interrupted:
    /// pre-Byzantium receipts carry no status and absence is not evidence
    /// of failure.
    pub fn interrupted(&self) -> bool {
        self.is_error == "1" || self.receipt_status == "0"
    }
}

fn wei_to_eth(raw: &str) -> f64 {
    raw.trim()
        .parse::<u128>()
        .map(|wei| wei as f64 / WEI_PER_ETH)
        .unwrap_or(0.0)
}
