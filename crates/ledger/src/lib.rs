//! # Papertrade Ledger Crate
//!
//! The ledger engine is the only writer of cash balances and trade history.
//! It validates trade input, captures a price from the oracle, and asks the
//! store to apply the cash change and the appended transaction as one atomic
//! step — so balances and recorded shares can never diverge.
//!
//! ## Architectural Principles
//!
//! - **The log is the state:** Holdings are signed sums over transaction
//!   rows, never a separately maintained position table. The only state that
//!   can be wrong is the log itself, which makes auditing a read.
//! - **All-or-nothing trades:** Every failure path — bad input, unknown
//!   symbol, unreachable oracle, insufficient funds or shares — leaves the
//!   balance and the log exactly as they were.
//! - **Injected collaborators:** The engine holds a [`database::TradeStore`]
//!   and a [`market_data::PriceOracle`] behind trait objects, so the test
//!   suite runs against the in-memory store and a fixed-price oracle.
//!
//! ## Public API
//!
//! - `LedgerEngine`: `record_purchase` / `record_sale`.
//! - `TradeReceipt`: the recorded transaction plus the new balance.
//! - `LedgerError`: the typed failure taxonomy callers map to user-facing
//!   responses.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;

// Re-export the key components to provide a clean, public-facing API.
pub use engine::{LedgerEngine, TradeReceipt};
pub use error::LedgerError;
