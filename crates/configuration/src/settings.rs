use rust_decimal::Decimal;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: Server,
    pub oracle: Oracle,
    pub accounts: Accounts,
}

/// Bind parameters for the HTTP adapter.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,
    pub port: u16,
}

/// Connection parameters for the quote provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Oracle {
    /// Base URL of the quote API (e.g., "https://cloud.iexapis.com/stable").
    pub base_url: String,
    /// Upper bound on any single quote request, in milliseconds. A provider
    /// that is slower than this surfaces as "quote unavailable" instead of
    /// hanging the caller.
    pub timeout_ms: u64,
}

/// Provisioning defaults for new accounts.
#[derive(Debug, Clone, Deserialize)]
pub struct Accounts {
    /// Cash balance granted to a freshly created account.
    pub starting_cash: Decimal,
}
