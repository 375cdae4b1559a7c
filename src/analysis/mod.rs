pub mod counterparty;
pub mod sybil;
pub mod transaction;

pub use counterparty::CounterpartyIndex;
pub use sybil::{SybilCandidate, select_candidates};
pub use transaction::Transaction;
