use crate::error::FetchError;
use serde::Deserialize;
use std::time::Duration;
use tokio::time::timeout;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

pub const ETHERSCAN_API: &str = "https://api.etherscan.io/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
const MAX_RETRIES: usize = 5;

/// One transaction record from the Etherscan `txlist` endpoint.
///
/// Every field defaults to the empty string: the remote payload is untrusted
/// and any key may be missing without failing the decode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawTxRecord {
    pub hash: String,
    pub from: String,
    pub to: String,
    pub value: String,
    pub gas: String,
    #[serde(rename = "gasPrice")]
    pub gas_price: String,
    #[serde(rename = "isError")]
    pub is_error: String,
    pub txreceipt_status: String,
    #[serde(rename = "blockNumber")]
    pub block_number: String,
    #[serde(rename = "timeStamp")]
    pub time_stamp: String,
}

/// Etherscan wraps every answer in a status/message/result envelope; `result`
/// is a record array on success but a plain string on errors, so it is kept
/// as a raw value until the status has been checked.
#[derive(Debug, Deserialize)]
struct TxListEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: serde_json::Value,
}

#[derive(Clone)]
pub struct EtherscanClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EtherscanClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(EtherscanClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn retry_strategy(&self) -> impl Iterator<Item = Duration> {
        ExponentialBackoff::from_millis(100)
            .factor(2)
            .max_delay(Duration::from_secs(10))
            .map(jitter)
            .take(MAX_RETRIES)
    }

    /// Fetches the historical transaction list for one address.
    ///
    /// Transport failures and timeouts are retried with exponential backoff;
    /// an unexpected API status is returned immediately since repeating the
    /// same request cannot fix it. "No transactions found" is an empty list,
    /// not an error.
    pub async fn fetch_transactions(
        &self,
        address: &str,
        max_txs: u32,
    ) -> Result<Vec<RawTxRecord>, FetchError> {
        let client = self.clone();
        let address = address.to_string();
        Retry::spawn(self.retry_strategy(), move || {
            let client = client.clone();
            let address = address.clone();
            async move {
                match client.fetch_once(&address, max_txs).await {
                    Ok(records) => Ok(Ok(records)),
                    Err(e @ FetchError::UnexpectedStatus { .. }) => Ok(Err(e)),
                    Err(e) => {
                        warn!("Fetch attempt for {} failed: {}, will retry", address, e);
                        Err(e)
                    }
                }
            }
        })
        .await
        .and_then(|r| r)
    }

    async fn fetch_once(
        &self,
        address: &str,
        max_txs: u32,
    ) -> Result<Vec<RawTxRecord>, FetchError> {
        debug!("Requesting txlist for {}", address);

        let offset = max_txs.to_string();
        let request = self.http.get(&self.base_url).query(&[
            ("module", "account"),
            ("action", "txlist"),
            ("address", address),
            ("startblock", "0"),
            ("endblock", "99999999"),
            ("page", "1"),
            ("offset", offset.as_str()),
            ("sort", "asc"),
            ("apikey", self.api_key.as_str()),
        ]);

        let response = match timeout(REQUEST_TIMEOUT, request.send()).await {
            Ok(response) => response?.error_for_status()?,
            Err(_) => return Err(FetchError::Timeout(REQUEST_TIMEOUT)),
        };

        let envelope: TxListEnvelope = response.json().await?;
        decode_envelope(address, envelope)
    }
}

fn decode_envelope(
    address: &str,
    envelope: TxListEnvelope,
) -> Result<Vec<RawTxRecord>, FetchError> {
    if envelope.status == "0"
        && envelope
            .message
            .to_lowercase()
            .starts_with("no transactions")
    {
        return Ok(Vec::new());
    }

    if envelope.status != "0" && envelope.status != "1" {
        return Err(FetchError::UnexpectedStatus {
            address: address.to_string(),
            status: envelope.status,
            message: envelope.message,
        });
    }

    Ok(serde_json::from_value(envelope.result)?)
}
