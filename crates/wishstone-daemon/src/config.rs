//! Configuration file management.
//!
//! Read from `config.toml` in the data directory. Every field has a default,
//! so a missing file or a partial file is fine. Cipher key material is never
//! read from here; it comes from `AES_KEY` / `AES_IV`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use wishstone_types::{DEFAULT_GLOBAL_DAILY_LIMIT, DEFAULT_PER_IP_DAILY_LIMIT};

use crate::gatekeeper::QuotaLimits;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "WISHSTONE_DATA_DIR";

/// Environment variable overriding the listen port.
pub const PORT_ENV: &str = "WISHSTONE_PORT";

/// Complete daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WishstoneConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Submission quotas.
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Language-model classifier settings.
    #[serde(default)]
    pub classifier: ClassifierConfig,
    /// Advanced settings.
    #[serde(default)]
    pub advanced: AdvancedConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
    /// SQLite file name inside the data directory.
    #[serde(default = "default_database_file")]
    pub database_file: String,
}

/// Quota configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Accepted submissions per day across all clients.
    #[serde(default = "default_global_daily_limit")]
    pub global_daily_limit: u64,
    /// Accepted submissions per day per client IP.
    #[serde(default = "default_per_ip_daily_limit")]
    pub per_ip_daily_limit: u64,
}

/// Which classifier implementation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierProvider {
    /// OpenAI-compatible chat-completions API.
    Openai,
    /// Fixed answer, no network.
    Stub,
}

/// Classifier configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_provider")]
    pub provider: ClassifierProvider,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f32,
    /// Upper bound on one classification call.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

/// Advanced configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvancedConfig {
    /// Log level: "debug" | "info" | "warn" | "error". `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// Default value functions

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5847
}

fn default_database_file() -> String {
    "wishstone_database.db".to_string()
}

fn default_global_daily_limit() -> u64 {
    DEFAULT_GLOBAL_DAILY_LIMIT
}

fn default_per_ip_daily_limit() -> u64 {
    DEFAULT_PER_IP_DAILY_LIMIT
}

fn default_provider() -> ClassifierProvider {
    ClassifierProvider::Openai
}

fn default_endpoint() -> String {
    wishstone_oracle::openai::DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    wishstone_oracle::openai::DEFAULT_MODEL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            database_file: default_database_file(),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            global_daily_limit: default_global_daily_limit(),
            per_ip_daily_limit: default_per_ip_daily_limit(),
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: 0.0,
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for AdvancedConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl WishstoneConfig {
    /// Load configuration from the default config file location.
    ///
    /// Falls back to defaults if file does not exist. `WISHSTONE_PORT`
    /// overrides the configured port.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        if let Ok(port) = std::env::var(PORT_ENV) {
            config.server.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("invalid {PORT_ENV} value {port:?}: {e}"))?;
        }
        Ok(config)
    }

    /// Load from an explicit file, or defaults if it does not exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: WishstoneConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Full path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.database_file)
    }

    /// Socket address the HTTP server binds to.
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.bind_address, self.server.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid listen address {addr:?}: {e}"))
    }

    /// Quota limits for the submission pipeline.
    pub fn quota_limits(&self) -> QuotaLimits {
        QuotaLimits {
            global_daily: self.quota.global_daily_limit,
            per_ip_daily: self.quota.per_ip_daily_limit,
        }
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Platform-specific default data directory.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            return PathBuf::from(dir);
        }
        #[cfg(target_os = "macos")]
        {
            dirs_fallback("Library/Application Support/Wishstone")
        }
        #[cfg(target_os = "windows")]
        {
            dirs_fallback("Wishstone")
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs_fallback(".wishstone")
        }
    }
}

/// Fallback home directory resolution.
fn dirs_fallback(subpath: &str) -> PathBuf {
    std::env::var("HOME")
        .map(|h| PathBuf::from(h).join(subpath))
        .unwrap_or_else(|_| PathBuf::from("/tmp/wishstone"))
}
