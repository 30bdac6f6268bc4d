use std::path::Path;
use std::time::Duration;

use lotto_core::models::TICKET_PRICE;
use lotto_core::rank::PrizeTable;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_CONFIG_FILE: &str = "lotto.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub ticket_price: u64,
    /// Used for local per-ticket evaluation; the backend stays authoritative.
    pub prizes: PrizeTable,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            ticket_price: TICKET_PRICE,
            prizes: PrizeTable::default(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ClientError::Config("base_url is empty".to_string()));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https:// (got '{}')",
                url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".to_string()));
        }
        if self.ticket_price == 0 {
            return Err(ClientError::Config("ticket_price must be positive".to_string()));
        }
        Ok(())
    }

    /// Defaults, then the JSON file if it exists, then the explicit base URL.
    pub fn resolve(path: &Path, base_url: Option<&str>) -> Result<Self> {
        let mut config = if path.exists() {
            load_config(path)?
        } else {
            tracing::debug!("no config file at {}, using defaults", path.display());
            ClientConfig::default()
        };
        if let Some(url) = base_url {
            config.base_url = url.to_string();
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }
}

pub fn load_config(path: &Path) -> Result<ClientConfig> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| ClientError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let config: ClientConfig = serde_json::from_str(&json)?;
    Ok(config)
}

pub fn save_config(config: &ClientConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json)
        .map_err(|e| ClientError::Config(format!("cannot write {}: {}", path.display(), e)))?;
    Ok(())
}
