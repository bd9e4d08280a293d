use crate::quote::RawQuote;
use async_trait::async_trait;
use configuration::settings::Oracle as OracleSettings;
use std::time::Duration;

pub mod error;
pub mod fixed;
pub mod quote;

// --- Public API ---
pub use error::OracleError;
pub use fixed::StaticPriceOracle;
pub use quote::Quote;

/// The generic, abstract interface to the market-data provider.
/// This trait is the contract the ledger engine and portfolio projector use,
/// allowing the underlying implementation (live or fixture) to be swapped
/// out.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    /// Looks up the current price and display name for a ticker symbol.
    ///
    /// Returns `Ok(None)` when the provider does not recognize the symbol.
    /// Transport failures and timeouts surface as `Err` — callers decide
    /// whether that is a hard failure or a degraded read.
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, OracleError>;
}

/// A concrete `PriceOracle` backed by an IEX-style HTTP quote API.
#[derive(Clone)]
pub struct HttpPriceOracle {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPriceOracle {
    /// Builds the client with the configured per-request timeout, so a stalled
    /// provider can never hang a trade for longer than that bound.
    pub fn new(settings: &OracleSettings) -> Result<Self, OracleError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceOracle for HttpPriceOracle {
    async fn lookup(&self, symbol: &str) -> Result<Option<Quote>, OracleError> {
        let url = format!("{}/stock/{}/quote", self.base_url, symbol);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        // The provider answers 404 for tickers outside its universe.
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(OracleError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let raw: RawQuote = serde_json::from_str(&text)
            .map_err(|e| OracleError::Deserialization(e.to_string()))?;

        Ok(Some(Quote {
            symbol: raw.symbol.to_uppercase(),
            name: raw.company_name,
            price: raw.latest_price,
        }))
    }
}
