//! # Papertrade Portfolio Crate
//!
//! Read-only derivation of what a user currently owns and what it is worth.
//! Nothing here writes: holdings are recomputed from the transaction log on
//! every call, so they cannot drift from it.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod error;
pub mod projector;

// Re-export the key components to provide a clean, public-facing API.
pub use aggregate::aggregate_holdings;
pub use error::ProjectorError;
pub use projector::{Holding, PortfolioProjector, PortfolioValuation};
