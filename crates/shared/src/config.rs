//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Posting engine configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

impl DatabaseConfig {
    /// Creates a configuration for `url` with default pool sizes.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
        }
    }
}

/// Posting engine configuration, handed to every repository at construction.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Take a row lock on the account before the balance check of a posting.
    #[serde(default = "default_lock_accounts")]
    pub lock_accounts: bool,
    /// Let debit appends take an account below zero.
    #[serde(default)]
    pub allow_overdraft: bool,
    /// Row limit used by reporting queries when the caller gives none.
    #[serde(default = "default_list_limit")]
    pub default_list_limit: u64,
    /// Upper bound for any requested row limit.
    #[serde(default = "default_max_list_limit")]
    pub max_list_limit: u64,
}

fn default_lock_accounts() -> bool {
    true
}

fn default_list_limit() -> u64 {
    100
}

fn default_max_list_limit() -> u64 {
    1000
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            lock_accounts: default_lock_accounts(),
            allow_overdraft: false,
            default_list_limit: default_list_limit(),
            max_list_limit: default_max_list_limit(),
        }
    }
}

impl LedgerConfig {
    /// Resolves a caller-supplied row limit against the configured bounds.
    #[must_use]
    pub fn clamp_limit(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.default_list_limit)
            .clamp(1, self.max_list_limit.max(1))
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("TESORO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
