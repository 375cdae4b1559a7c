use crate::analysis::Transaction;
use std::collections::{BTreeMap, BTreeSet};

/// Maps each observed counterparty address to the set of input wallets it
/// transacted with, as either sender or receiver.
///
/// Accumulation is commutative and idempotent: the final index is the same
/// for any wallet processing order, and replaying a wallet's stream adds
/// nothing new. Entries are created lazily on first observation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CounterpartyIndex {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl CounterpartyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records both endpoints of a transaction as candidate counterparties
    /// of `wallet`. Empty addresses (contract creation, malformed records)
    /// and the wallet itself are skipped.
    pub fn observe(&mut self, wallet: &str, tx: &Transaction) {
        let owner = wallet.to_lowercase();
        for candidate in [tx.from.as_str(), tx.to.as_str()] {
            if candidate.is_empty() {
                continue;
            }
            let candidate = candidate.to_lowercase();
            if candidate == owner {
                continue;
            }
            self.entries.entry(candidate).or_default().insert(owner.clone());
        }
    }

    pub fn wallets_for(&self, counterparty: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(counterparty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::etherscan::RawTxRecord;

    fn tx(wallet: &str, from: &str, to: &str) -> Transaction {
        Transaction::from_raw(
            wallet,
            RawTxRecord {
                from: from.to_string(),
                to: to.to_string(),
                ..RawTxRecord::default()
            },
        )
    }

    #[test]
    fn records_both_endpoints() {
        let mut index = CounterpartyIndex::new();
        index.observe("0xaaa", &tx("0xaaa", "0xbbb", "0xccc"));
        assert!(index.wallets_for("0xbbb").unwrap().contains("0xaaa"));
        assert!(index.wallets_for("0xccc").unwrap().contains("0xaaa"));
    }

    #[test]
    fn self_transactions_are_excluded() {
        let mut index = CounterpartyIndex::new();
        index.observe("0xaaa", &tx("0xaaa", "0xaaa", "0xaaa"));
        assert!(index.is_empty());
    }

    #[test]
    fn empty_endpoints_are_skipped() {
        // Contract creation leaves `to` empty.
        let mut index = CounterpartyIndex::new();
        index.observe("0xaaa", &tx("0xaaa", "0xaaa", ""));
        assert!(index.is_empty());
    }

    #[test]
    fn candidates_are_lowercased_before_comparison() {
        let mut index = CounterpartyIndex::new();
        index.observe("0xAAA", &tx("0xAAA", "0xAAA", "0xCCC"));
        assert_eq!(index.len(), 1);
        assert!(index.wallets_for("0xccc").unwrap().contains("0xaaa"));
    }

    #[test]
    fn repeated_observations_do_not_duplicate() {
        let mut index = CounterpartyIndex::new();
        let transaction = tx("0xaaa", "0xaaa", "0xccc");
        index.observe("0xaaa", &transaction);
        index.observe("0xaaa", &transaction);
        assert_eq!(index.wallets_for("0xccc").unwrap().len(), 1);
    }

    #[test]
    fn replaying_a_stream_is_idempotent() {
        let stream = vec![
            tx("0xaaa", "0xaaa", "0xccc"),
            tx("0xaaa", "0xddd", "0xaaa"),
        ];

        let mut once = CounterpartyIndex::new();
        for t in &stream {
            once.observe("0xaaa", t);
        }

        let mut twice = once.clone();
        for t in &stream {
            twice.observe("0xaaa", t);
        }

        assert_eq!(once, twice);
    }

    #[test]
    fn wallet_order_does_not_change_the_index() {
        let a = tx("0xaaa", "0xaaa", "0xccc");
        let b = tx("0xbbb", "0xccc", "0xbbb");

        let mut forward = CounterpartyIndex::new();
        forward.observe("0xaaa", &a);
        forward.observe("0xbbb", &b);

        let mut reverse = CounterpartyIndex::new();
        reverse.observe("0xbbb", &b);
        reverse.observe("0xaaa", &a);

        assert_eq!(forward, reverse);
        assert_eq!(forward.wallets_for("0xccc").unwrap().len(), 2);
    }
}
