pub mod analysis;
pub mod auditor;
pub mod config;
pub mod error;
pub mod etherscan;
pub mod report;
pub mod wallets;
