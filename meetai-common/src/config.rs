//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration comes from a TOML file. A missing file is not
//! fatal: the service logs a warning and runs on built-in defaults.
//!
//! Root folder priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`MEETAI_ROOT_FOLDER`)
//! 3. TOML `root_folder`
//! 4. OS-dependent compiled default (fallback)

use crate::usage::gate::{FreeTierPolicy, DEFAULT_MAX_FREE_AGENTS, DEFAULT_MAX_FREE_MEETINGS};
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "MEETAI_ROOT_FOLDER";

/// Environment variable naming the TOML config file
pub const CONFIG_PATH_ENV: &str = "MEETAI_CONFIG";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "meetai.db";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Data folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub free_tier: FreeTierConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub billing: BillingConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Free-tier caps before referral bonus
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FreeTierConfig {
    #[serde(default = "default_max_agents")]
    pub max_agents: u64,

    #[serde(default = "default_max_meetings")]
    pub max_meetings: u64,
}

impl Default for FreeTierConfig {
    fn default() -> Self {
        Self {
            max_agents: default_max_agents(),
            max_meetings: default_max_meetings(),
        }
    }
}

impl FreeTierConfig {
    pub fn policy(&self) -> FreeTierPolicy {
        FreeTierPolicy::new(self.max_agents, self.max_meetings)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Billing provider mirror settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BillingConfig {
    /// Token the billing sync job must present; sync is disabled when unset
    #[serde(default)]
    pub sync_token: Option<String>,

    /// Plans offered for upgrade, seeded into the products table at startup
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

/// A purchasable plan
#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Price in the smallest currency unit (cents)
    pub price_amount: i64,
    #[serde(default = "default_true")]
    pub is_recurring: bool,
    #[serde(default)]
    pub is_archived: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5730
}

fn default_max_agents() -> u64 {
    DEFAULT_MAX_FREE_AGENTS
}

fn default_max_meetings() -> u64 {
    DEFAULT_MAX_FREE_MEETINGS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

impl TomlConfig {
    /// Parse and validate TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TomlConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration and report where it came from.
    ///
    /// An explicitly named file must exist. Without one, the platform
    /// default location is tried and a missing file falls back to defaults.
    /// Nothing is logged here; callers log the returned [`ConfigSource`] once
    /// tracing is initialised.
    pub fn load(explicit_path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        if let Some(path) = explicit_path {
            let content = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
            })?;
            let config = Self::from_toml_str(&content)?;
            return Ok((config, ConfigSource::File(path.to_path_buf())));
        }

        match default_config_path() {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                let config = Self::from_toml_str(&content)?;
                Ok((config, ConfigSource::File(path)))
            }
            _ => Ok((Self::default(), ConfigSource::Defaults)),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::Config("server.port must be non-zero".to_string()));
        }
        if self.server.host.trim().is_empty() {
            return Err(Error::Config("server.host must not be empty".to_string()));
        }
        for product in &self.billing.products {
            if product.id.trim().is_empty() || product.name.trim().is_empty() {
                return Err(Error::Config(
                    "billing.products entries need a non-empty id and name".to_string(),
                ));
            }
            if product.price_amount < 0 {
                return Err(Error::Config(format!(
                    "Product '{}' has a negative price",
                    product.id
                )));
            }
        }
        Ok(())
    }
}

/// Where a loaded [`TomlConfig`] came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Defaults => {
                warn!("No configuration file found, using built-in defaults")
            }
        }
    }
}

/// Resolve the root folder following the documented priority order
pub fn resolve_root_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Database file inside `root_folder`
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

/// Platform config file location (`<config dir>/meetai/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    let user_config = dirs::config_dir().map(|d| d.join("meetai").join("config.toml"));

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/meetai/config.toml");
        match user_config {
            Some(path) if path.exists() => Some(path),
            _ if system_config.exists() => Some(system_config),
            other => other,
        }
    } else {
        user_config
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("meetai"))
        .unwrap_or_else(|| PathBuf::from("./meetai_data"))
}
