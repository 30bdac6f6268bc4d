use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LottoError {
    #[error("invalid ticket: {0}")]
    InvalidTicket(String),
    #[error("invalid winning draw: {0}")]
    InvalidDraw(String),
    #[error("invalid purchase amount: {0}")]
    InvalidAmount(String),
}

pub type Result<T> = std::result::Result<T, LottoError>;
