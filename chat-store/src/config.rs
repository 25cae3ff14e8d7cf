use crate::errors::StoreError;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://vta_chat.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection settings for the SQLite store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub database_url: String,
    pub max_connections: u32,
}

impl StoreConfig {
    /// Reads `CHAT_DATABASE_URL` and `CHAT_DATABASE_MAX_CONNECTIONS`.
    pub fn from_env() -> Result<Self, StoreError> {
        let database_url = std::env::var("CHAT_DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let max_connections = match std::env::var("CHAT_DATABASE_MAX_CONNECTIONS") {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().parse::<u32>().map_err(|e| {
                StoreError::Config(format!("CHAT_DATABASE_MAX_CONNECTIONS='{raw}': {e}"))
            })?,
            _ => DEFAULT_MAX_CONNECTIONS,
        };

        let cfg = Self {
            database_url,
            max_connections,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Private in-memory database. A single connection keeps every query on the same database.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if !self.database_url.starts_with("sqlite:") {
            return Err(StoreError::Config(format!(
                "CHAT_DATABASE_URL must be a sqlite URL, got '{}'",
                self.database_url
            )));
        }
        if self.max_connections == 0 {
            return Err(StoreError::Config(
                "CHAT_DATABASE_MAX_CONNECTIONS must be > 0".into(),
            ));
        }
        Ok(())
    }
}
