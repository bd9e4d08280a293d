use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("Failed to reach the quote provider: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("The quote provider returned an unexpected status: {0}")]
    Status(u16),

    #[error("Failed to deserialize the quote response: {0}")]
    Deserialization(String),
}
