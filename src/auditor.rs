use crate::analysis::{CounterpartyIndex, Transaction};
use crate::etherscan::{EtherscanClient, RawTxRecord};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Everything one run accumulates: the full normalized ledger, the
/// per-wallet interrupted lists (fetch order preserved) and the
/// counterparty index. Pure in-memory state, independent of how the raw
/// records were obtained.
#[derive(Debug, Clone, Default)]
pub struct AuditOutcome {
    pub transactions: Vec<Transaction>,
    pub interrupted: BTreeMap<String, Vec<Transaction>>,
    pub counterparties: CounterpartyIndex,
}

impl AuditOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one wallet's raw transaction stream into the outcome.
    pub fn ingest(&mut self, wallet: &str, records: Vec<RawTxRecord>) {
        let wallet = wallet.to_lowercase();
        for record in records {
            let tx = Transaction::from_raw(&wallet, record);

            if tx.interrupted() {
                self.interrupted
                    .entry(wallet.clone())
                    .or_default()
                    .push(tx.clone());
            }

            self.counterparties.observe(&wallet, &tx);
            self.transactions.push(tx);
        }
    }

    pub fn interrupted_for(&self, wallet: &str) -> &[Transaction] {
        self.interrupted
            .get(&wallet.to_lowercase())
            .map_or(&[], Vec::as_slice)
    }
}

/// Drives the per-wallet fetch loop and feeds the accumulator.
pub struct Auditor {
    client: EtherscanClient,
    max_txs_per_wallet: u32,
    call_delay: Duration,
}

impl Auditor {
    pub fn new(client: EtherscanClient, max_txs_per_wallet: u32, call_delay: Duration) -> Self {
        Auditor {
            client,
            max_txs_per_wallet,
            call_delay,
        }
    }

    /// Queries every wallet sequentially, pausing between calls to respect
    /// the API rate limit. A failed fetch degrades that wallet to an empty
    /// transaction list and the run continues; the failure count is returned
    /// alongside the outcome for the summary log.
    pub async fn run(&self, wallets: &[String]) -> (AuditOutcome, usize) {
        let mut outcome = AuditOutcome::new();
        let mut failed_wallets = 0;

        for wallet in wallets {
            let records = match self
                .client
                .fetch_transactions(wallet, self.max_txs_per_wallet)
                .await
            {
                Ok(records) => records,
                Err(e) => {
                    warn!("Error fetching txs for {}: {}", wallet, e);
                    failed_wallets += 1;
                    Vec::new()
                }
            };
            sleep(self.call_delay).await;

            info!("Fetched {} transactions for {}", records.len(), wallet);
            outcome.ingest(wallet, records);
        }

        (outcome, failed_wallets)
    }
}
