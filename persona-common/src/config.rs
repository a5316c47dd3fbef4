//! Configuration loading and resolution
//!
//! Every setting is resolved with the same priority order:
//! 1. Command-line argument or environment variable (`ConfigOverrides`,
//!    filled by the binary's argument parser)
//! 2. TOML config file
//! 3. Compiled default

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://persona.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_AGE_URL: &str = "https://api.agify.io";
pub const DEFAULT_GENDER_URL: &str = "https://api.genderize.io";
pub const DEFAULT_NATIONALITY_URL: &str = "https://api.nationalize.io";

/// TOML config file contents
///
/// Every field is optional; absent fields fall through to compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub bind_addr: Option<String>,
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub logging: LoggingConfig,
    pub classifiers: ClassifierUrls,
}

/// `[logging]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// `[classifiers]` table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierUrls {
    pub age_url: Option<String>,
    pub gender_url: Option<String>,
    pub nationality_url: Option<String>,
}

/// Resolved classifier endpoints, handed to the classifier clients at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierEndpoints {
    pub age_url: String,
    pub gender_url: String,
    pub nationality_url: String,
}

impl Default for ClassifierEndpoints {
    fn default() -> Self {
        Self {
            age_url: DEFAULT_AGE_URL.to_string(),
            gender_url: DEFAULT_GENDER_URL.to_string(),
            nationality_url: DEFAULT_NATIONALITY_URL.to_string(),
        }
    }
}

/// Highest-priority values (command line / environment)
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub bind_addr: Option<String>,
    pub database_url: Option<String>,
    pub max_connections: Option<u32>,
    pub log_level: Option<String>,
    pub age_url: Option<String>,
    pub gender_url: Option<String>,
    pub nationality_url: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub max_connections: u32,
    pub log_level: String,
    pub classifiers: ClassifierEndpoints,
}

impl ServiceConfig {
    /// Resolve configuration from overrides, TOML file contents and defaults
    pub fn resolve(overrides: &ConfigOverrides, toml: &TomlConfig) -> Result<Self> {
        let bind_addr = pick(&overrides.bind_addr, &toml.bind_addr, DEFAULT_BIND_ADDR);
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address '{}': {}", bind_addr, e)))?;

        let max_connections = overrides
            .max_connections
            .or(toml.max_connections)
            .unwrap_or(DEFAULT_MAX_CONNECTIONS);
        if max_connections == 0 {
            return Err(Error::Config("max_connections must be at least 1".to_string()));
        }

        let classifiers = ClassifierEndpoints {
            age_url: pick(&overrides.age_url, &toml.classifiers.age_url, DEFAULT_AGE_URL),
            gender_url: pick(
                &overrides.gender_url,
                &toml.classifiers.gender_url,
                DEFAULT_GENDER_URL,
            ),
            nationality_url: pick(
                &overrides.nationality_url,
                &toml.classifiers.nationality_url,
                DEFAULT_NATIONALITY_URL,
            ),
        };

        Ok(Self {
            bind_addr,
            database_url: pick(&overrides.database_url, &toml.database_url, DEFAULT_DATABASE_URL),
            max_connections,
            log_level: pick(&overrides.log_level, &toml.logging.level, DEFAULT_LOG_LEVEL),
            classifiers,
        })
    }
}

/// First non-blank value wins
fn pick(override_value: &Option<String>, toml_value: &Option<String>, default: &str) -> String {
    override_value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| toml_value.as_deref().filter(|v| !v.trim().is_empty()))
        .unwrap_or(default)
        .to_string()
}

/// Default config file location (`<config dir>/persona/persona.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("persona").join("persona.toml"))
}

/// Load TOML configuration
///
/// An explicitly requested file must exist. The default file is optional:
/// when it is missing, defaults are used.
pub fn load_toml_config(explicit_path: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit_path {
        if !path.exists() {
            return Err(Error::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return read_toml_config(path);
    }

    match default_config_path() {
        Some(path) if path.exists() => read_toml_config(&path),
        Some(path) => {
            warn!(
                "No config file at {}, using defaults and overrides",
                path.display()
            );
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using defaults and overrides");
            Ok(TomlConfig::default())
        }
    }
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    info!("Loaded config file: {}", path.display());
    Ok(config)
}
