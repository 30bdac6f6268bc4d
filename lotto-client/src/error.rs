use lotto_core::error::LottoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("server error ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("no winning result recorded yet for purchase {0}")]
    NoResultYet(u64),
    #[error("purchase id missing from server response")]
    MissingPurchaseId,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Domain(#[from] LottoError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
