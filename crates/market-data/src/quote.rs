use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time quote for a single ticker symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    /// Display name of the company.
    pub name: String,
    pub price: Decimal,
}

/// The raw quote payload as the provider ships it.
// Using `#[serde(rename_all = "camelCase")]` to automatically map from JSON camelCase to Rust snake_case.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawQuote {
    pub symbol: String,
    pub company_name: String,
    pub latest_price: Decimal,
}
