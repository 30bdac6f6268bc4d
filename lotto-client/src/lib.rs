pub mod config;
pub mod error;
pub mod provider;
pub mod types;

pub use provider::{HttpProvider, LottoProvider};
