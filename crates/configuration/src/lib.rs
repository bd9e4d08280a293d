use crate::error::ConfigError;
use rust_decimal::Decimal;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{Accounts, Config, Oracle, Server};

/// Loads the application configuration from the `config.toml` file.
///
/// This function is the primary entry point for this crate. It reads the
/// configuration file, deserializes it into our strongly-typed `Config`
/// struct, and sanity-checks the values that have invariants attached.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        // Tells the builder to look for a file named `config.toml`
        .add_source(config::File::with_name("config.toml"))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;

    // A negative starting balance would violate the balance invariant on the
    // very first trade check.
    if config.accounts.starting_cash < Decimal::ZERO {
        return Err(ConfigError::Invalid(
            "accounts.starting_cash must not be negative".to_string(),
        ));
    }
    if config.oracle.timeout_ms == 0 {
        return Err(ConfigError::Invalid(
            "oracle.timeout_ms must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}
