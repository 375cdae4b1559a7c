use crate::analysis::CounterpartyIndex;
use crate::error::AuditError;
use serde::Serialize;

/// A counterparty seen with at least `threshold` distinct input wallets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SybilCandidate {
    pub address: String,
    pub wallet_count: usize,
    /// Sorted, comma-joined wallet set, ready for tabular output.
    pub wallets: String,
}

/// Filters the counterparty index down to Sybil candidates.
///
/// Candidates are ranked by wallet_count descending; ties break on the
/// address ascending so output is deterministic run to run. An empty result
/// is a valid outcome, a threshold below 1 is not.
pub fn select_candidates(
    index: &CounterpartyIndex,
    threshold: usize,
) -> Result<Vec<SybilCandidate>, AuditError> {
    if threshold < 1 {
        return Err(AuditError::InvalidConfiguration(format!(
            "sybil threshold must be >= 1, got {threshold}"
        )));
    }

    let mut candidates: Vec<SybilCandidate> = index
        .iter()
        .filter(|(_, wallets)| wallets.len() >= threshold)
        .map(|(address, wallets)| SybilCandidate {
            address: address.clone(),
            wallet_count: wallets.len(),
            wallets: wallets.iter().cloned().collect::<Vec<_>>().join(","),
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.wallet_count
            .cmp(&a.wallet_count)
            .then_with(|| a.address.cmp(&b.address))
    });

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Transaction;
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

    fn index_with(pairs: &[(&str, &str)]) -> CounterpartyIndex {
        // (wallet, counterparty) observations
        let mut index = CounterpartyIndex::new();
        for (wallet, counterparty) in pairs {
            index.observe(wallet, &tx(wallet, wallet, counterparty));
        }
        index
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let index = index_with(&[("0xaaa", "0xccc"), ("0xbbb", "0xccc"), ("0xaaa", "0xddd")]);

        let candidates = select_candidates(&index, 2).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].address, "0xccc");
        assert_eq!(candidates[0].wallet_count, 2);
        assert_eq!(candidates[0].wallets, "0xaaa,0xbbb");
    }

    #[test]
    fn below_threshold_is_excluded() {
        let index = index_with(&[("0xaaa", "0xccc")]);
        let candidates = select_candidates(&index, 2).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn ranked_by_count_then_address() {
        let index = index_with(&[
            ("0xaaa", "0xfff"),
            ("0xbbb", "0xfff"),
            ("0xccc", "0xfff"),
            ("0xaaa", "0xeee"),
            ("0xbbb", "0xeee"),
            ("0xaaa", "0xddd"),
            ("0xbbb", "0xddd"),
        ]);

        let candidates = select_candidates(&index, 2).unwrap();
        let addresses: Vec<&str> = candidates.iter().map(|c| c.address.as_str()).collect();
        assert_eq!(addresses, vec!["0xfff", "0xddd", "0xeee"]);
    }

    #[test]
    fn zero_threshold_is_invalid() {
        let index = CounterpartyIndex::new();
        let err = select_candidates(&index, 0).unwrap_err();
        assert!(matches!(err, AuditError::InvalidConfiguration(_)));
    }

    #[test]
    fn empty_index_yields_empty_result() {
        let index = CounterpartyIndex::new();
        assert!(select_candidates(&index, 2).unwrap().is_empty());
    }
}
