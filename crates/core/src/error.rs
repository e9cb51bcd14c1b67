use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TierTagError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

pub type Result<T> = std::result::Result<T, TierTagError>;
