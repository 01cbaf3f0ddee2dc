use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid outline: {0}")]
    InvalidOutline(String),

    #[error("Invalid chunk list: {0}")]
    InvalidChunks(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
