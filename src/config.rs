//! Configuration module
//!
//! Application settings are read from a TOML file. Every section is optional;
//! a missing file or an empty section falls back to the defaults below.
//!
//! ```toml
//! [server]
//! api_host = "0.0.0.0"
//! api_port = 8080
//!
//! [database]
//! url = "sqlite://./user-settings.db?mode=rwc"
//!
//! [security]
//! jwt_secret = "change-me"
//! jwt_expiration_hours = 24
//! bcrypt_cost = 12
//!
//! [logging]
//! level = "info"
//!
//! [cache]
//! enabled = true
//!
//! [admin]
//! username = "hr"
//! email = "hr@example.com"
//! name = "HR Administrator"
//! password = "change-me-now"
//!
//! [catalog]
//! knowledges = ["Rust", "SQL"]
//! skills = ["Communication"]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::DatabaseConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub admin: AdminConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "user-settings-secret-key-change-in-production".to_string(),
            jwt_expiration_hours: 24,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// HR account created on first start when the user table is empty
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub name: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "hr".to_string(),
            email: "hr@example.com".to_string(),
            name: "HR Administrator".to_string(),
            password: "change-me-now".to_string(),
        }
    }
}

/// Labels seeded into empty catalogs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub knowledges: Vec<String>,
    pub skills: Vec<String>,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&raw)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(path, raw).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_hours: self.security.jwt_expiration_hours,
            issuer: "user-settings".to_string(),
        }
    }
}

/// `$SETTINGS_CONFIG`, or `<config dir>/user-settings/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("SETTINGS_CONFIG") {
        return PathBuf::from(path);
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("user-settings")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = AppConfig::from_toml("").unwrap();
        assert_eq!(cfg.server.api_port, 8080);
        assert!(cfg.cache.enabled);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.catalog.knowledges.is_empty());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            api_port = 9090

            [cache]
            enabled = false

            [catalog]
            knowledges = ["Rust", "SQL"]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.api_port, 9090);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert!(!cfg.cache.enabled);
        assert_eq!(cfg.catalog.knowledges, vec!["Rust", "SQL"]);
        assert_eq!(cfg.security.jwt_expiration_hours, 24);
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(
            AppConfig::from_toml("[server]\napi_port = \"x\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("user-settings-missing").join("nope.toml");
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.admin.username, "hr");
    }

    #[test]
    fn save_then_load_preserves_values() {
        let path = std::env::temp_dir()
            .join(format!("user-settings-{}", uuid::Uuid::new_v4()))
            .join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.security.bcrypt_cost = 6;
        cfg.catalog.skills = vec!["Communication".into()];
        cfg.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.security.bcrypt_cost, 6);
        assert_eq!(loaded.catalog.skills, vec!["Communication"]);
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
