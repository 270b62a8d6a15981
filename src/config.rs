//! Configuration types.

use std::path::PathBuf;

use crate::engine::registry::WHO_APPROVED_PRODUCTS;
use crate::error::{ConfigError, Result};

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// Service configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Interface to bind.
    pub host: String,
    /// HTTP port.
    pub port: u16,
    /// libSQL database file.
    pub db_path: PathBuf,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    /// Approved product types for claim verification.
    pub trust_registry: Vec<String>,
    /// Mount the demo seed endpoints.
    pub seed_enabled: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            db_path: PathBuf::from("./data/relief-ledger.db"),
            cors_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            trust_registry: WHO_APPROVED_PRODUCTS.iter().map(|s| s.to_string()).collect(),
            seed_enabled: true,
        }
    }
}

impl ServiceConfig {
    /// Build from `RELIEF_LEDGER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let host = lookup("RELIEF_LEDGER_HOST").unwrap_or(defaults.host);

        let port = match lookup("RELIEF_LEDGER_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                key: "RELIEF_LEDGER_PORT".into(),
                message: format!("{raw:?}: {e}"),
            })?,
            None => defaults.port,
        };

        let db_path = lookup("RELIEF_LEDGER_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let cors_origins = lookup("RELIEF_LEDGER_CORS_ORIGINS")
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.cors_origins);

        let trust_registry = lookup("RELIEF_LEDGER_TRUST_REGISTRY")
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty())
            .unwrap_or(defaults.trust_registry);

        let seed_enabled = match lookup("RELIEF_LEDGER_SEED_ENABLED") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| ConfigError::InvalidValue {
                key: "RELIEF_LEDGER_SEED_ENABLED".into(),
                message: format!("{raw:?} is not a boolean"),
            })?,
            None => defaults.seed_enabled,
        };

        Ok(Self {
            host,
            port,
            db_path,
            cors_origins,
            trust_registry,
            seed_enabled,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
