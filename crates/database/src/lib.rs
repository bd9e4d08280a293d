//! # Papertrade Database Crate
//!
//! This crate owns the two pieces of persistent state in the system: the
//! account store (one cash balance per user) and the append-only transaction
//! log. Everything else in the application is derived from these.
//!
//! ## Architectural Principles
//!
//! - **One seam, two backends:** The [`TradeStore`] trait is the interface the
//!   ledger engine and portfolio projector are handed. `DbRepository` backs it
//!   with PostgreSQL; `MemoryStore` backs it with process memory so the core
//!   crates are testable with no external services.
//! - **Atomic trade application:** `apply_purchase` and `apply_sale` are the
//!   only writers of cash and the only appenders of transactions. Each runs
//!   as a single database transaction that locks the user's account row, so
//!   a cash change and its transaction row commit together or not at all.
//! - **Asynchronous & Pooled:** All operations are asynchronous, and the
//!   PostgreSQL backend uses a connection pool (`PgPool`) for concurrent
//!   access.
//!
//! ## Public API
//!
//! - `connect`: The async function to establish the database connection pool.
//! - `run_migrations`: A utility to apply database migrations, ensuring the schema is up-to-date.
//! - `TradeStore`: The storage seam consumed by the core crates.
//! - `DbRepository` / `MemoryStore`: The two implementations.
//! - `StoreError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use repository::DbRepository;
pub use store::TradeStore;
