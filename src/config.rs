use crate::error::AuditError;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SYBIL_THRESHOLD: usize = 2;
pub const DEFAULT_MAX_TXS_PER_WALLET: u32 = 10_000;
pub const DEFAULT_CALL_DELAY_MS: u64 = 200;

#[derive(Debug, Clone)]
pub struct Config {
    pub wallets_path: PathBuf,
    pub api_key: String,
    pub sybil_threshold: usize,
    pub max_txs_per_wallet: u32,
    pub call_delay: Duration,
    pub output_dir: PathBuf,
}

impl Config {
    /// Builds the runtime configuration from CLI values, falling back to the
    /// environment (via `.env`) for the API key. Validation happens here so
    /// that a bad setup aborts before any network call is made.
    pub fn resolve(
        wallets_path: PathBuf,
        api_key: Option<String>,
        sybil_threshold: usize,
        max_txs_per_wallet: u32,
        call_delay_ms: u64,
        output_dir: PathBuf,
    ) -> Result<Self> {
        dotenv::dotenv().ok();

        let api_key = match api_key.or_else(|| std::env::var("ETHERSCAN_API_KEY").ok()) {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                return Err(AuditError::InvalidConfiguration(
                    "Etherscan API key required: pass --apikey or set ETHERSCAN_API_KEY"
                        .to_string(),
                )
                .into());
            }
        };

        if sybil_threshold < 1 {
            return Err(AuditError::InvalidConfiguration(format!(
                "sybil threshold must be >= 1, got {sybil_threshold}"
            ))
            .into());
        }

        Ok(Config {
            wallets_path,
            api_key,
            sybil_threshold,
            max_txs_per_wallet,
            call_delay: Duration::from_millis(call_delay_ms),
            output_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_with(api_key: Option<String>, threshold: usize) -> Result<Config> {
        Config::resolve(
            PathBuf::from("wallets.txt"),
            api_key,
            threshold,
            DEFAULT_MAX_TXS_PER_WALLET,
            DEFAULT_CALL_DELAY_MS,
            PathBuf::from("output"),
        )
    }

    #[test]
    fn explicit_api_key_is_accepted() {
        let config = resolve_with(Some("KEY123".to_string()), 2).unwrap();
        assert_eq!(config.api_key, "KEY123");
        assert_eq!(config.sybil_threshold, 2);
        assert_eq!(config.call_delay, Duration::from_millis(200));
    }

    #[test]
    fn zero_threshold_is_rejected() {
        let err = resolve_with(Some("KEY123".to_string()), 0).unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let err = resolve_with(Some("  ".to_string()), 2).unwrap_err();
        assert!(err.to_string().contains("API key"));
    }
}
