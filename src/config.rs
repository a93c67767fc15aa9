use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub session: SessionConfig,

    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// SQLite database path, or a full `sqlite:` URL.
    pub database_path: String,

    pub log_level: String,

    /// Tokio worker threads; 0 means the runtime default.
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "gatehouse.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 0,
        }
    }
}

impl GeneralConfig {
    #[must_use]
    pub fn database_url(&self) -> String {
        if self.database_path.starts_with("sqlite:") {
            self.database_path.clone()
        } else {
            format!("sqlite:{}", self.database_path)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,

    pub port: u16,

    /// Whether to set the Secure flag on session cookies.
    /// Default: false so the portal works over plain HTTP in local setups;
    /// set to true behind TLS.
    pub secure_cookies: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8085,
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session expiry on inactivity, in minutes.
    pub inactivity_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            inactivity_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Argon2 memory cost in KiB (default: 8192 = 8MB)
    pub argon2_memory_cost_kib: u32,

    /// Argon2 time cost (iterations) - higher = more CPU work
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (default: 1)
    pub argon2_parallelism: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            argon2_memory_cost_kib: 8192,
            argon2_time_cost: 3,
            argon2_parallelism: 1,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = Self::default();
        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                config = Self::load_from_path(path)?;
                break;
            }
        }

        config.apply_env_overrides()?;

        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("gatehouse").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".gatehouse").join("config.toml"));
        }

        paths
    }

    /// Environment takes precedence over the config file, so a container
    /// deployment can point at its database without shipping a TOML file.
    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var("GATEHOUSE_DATABASE") {
            self.general.database_path = path;
        }

        if let Ok(port) = std::env::var("GATEHOUSE_PORT") {
            self.server.port = port
                .parse()
                .context("GATEHOUSE_PORT must be a port number")?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.general.database_path.is_empty() {
            anyhow::bail!("Database path cannot be empty");
        }

        if self.session.inactivity_minutes <= 0 {
            anyhow::bail!("Session inactivity expiry must be > 0 minutes");
        }

        if self.security.argon2_time_cost == 0 || self.security.argon2_parallelism == 0 {
            anyhow::bail!("Argon2 cost parameters must be > 0");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn database_url_keeps_explicit_scheme() {
        let mut general = GeneralConfig::default();
        assert_eq!(general.database_url(), "sqlite:gatehouse.db");

        general.database_path = "sqlite::memory:".to_string();
        assert_eq!(general.database_url(), "sqlite::memory:");
    }

    #[test]
    fn rejects_zero_session_expiry() {
        let mut config = Config::default();
        config.session.inactivity_minutes = 0;
        assert!(config.validate().is_err());
    }
}
