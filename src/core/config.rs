/// Application configuration
///
/// Loaded once at startup from a TOML file, then overridden from the
/// environment (a `.env` file is honoured via `dotenv`). The result is
/// immutable and handed to the components that need it.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::utils::{
    is_valid_domain, mask_sensitive, BCRYPT_MAX_COST, BCRYPT_MIN_COST, DEFAULT_NAMESPACE,
    DEFAULT_REGION, DEFAULT_UTC_OFFSET_HOURS, MAX_UTC_OFFSET_HOURS, MIN_UTC_OFFSET_HOURS,
};

pub const DEFAULT_CONFIG_FILE: &str = "p2k.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub cloudwatch: CloudWatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: bool,
    /// Bearer token for `/api/admin/*`; unset leaves admin routes open
    pub admin_token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            cors: false,
            admin_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://p2k.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub bcrypt_cost: u32,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

/// Credentials and target for the CloudWatch metrics client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CloudWatchConfig {
    pub instance_id: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub namespace: String,
    /// Offset used for day boundaries of the query window
    pub utc_offset_hours: i32,
}

impl Default for CloudWatchConfig {
    fn default() -> Self {
        Self {
            instance_id: String::new(),
            access_key: String::new(),
            secret_key: String::new(),
            region: DEFAULT_REGION.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
        }
    }
}

impl CloudWatchConfig {
    pub fn is_configured(&self) -> bool {
        !self.instance_id.is_empty() && !self.access_key.is_empty() && !self.secret_key.is_empty()
    }

    pub fn utc_offset_in_range(&self) -> bool {
        (MIN_UTC_OFFSET_HOURS..=MAX_UTC_OFFSET_HOURS).contains(&self.utc_offset_hours)
    }
}

impl AppConfig {
    /// Resolve the config file path: explicit argument, `P2K_CONFIG`, or the default
    pub fn config_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        std::env::var("P2K_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from file (defaults if missing) and apply env overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::config_path(explicit);
        let mut config = Self::from_file(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file only
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&contents)
            .context("Failed to parse config file")?;

        Ok(config)
    }

    /// Override values from the environment
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("P2K_DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = lookup("P2K_ADMIN_TOKEN") {
            self.server.admin_token = Some(v);
        }
        if let Some(v) = lookup("CLOUDWATCH_INSTANCE_ID") {
            self.cloudwatch.instance_id = v;
        }
        if let Some(v) = lookup("CLOUDWATCH_ACCESS_KEY") {
            self.cloudwatch.access_key = v;
        }
        if let Some(v) = lookup("CLOUDWATCH_SECRET_KEY") {
            self.cloudwatch.secret_key = v;
        }
        if let Some(v) = lookup("CLOUDWATCH_REGION") {
            self.cloudwatch.region = v;
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;

        fs::write(path, contents)
            .context("Failed to write config file")?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.database.url.is_empty() {
            errors.push("database.url is not set".to_string());
        }

        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be at least 1".to_string());
        }

        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&self.security.bcrypt_cost) {
            errors.push(format!(
                "security.bcrypt_cost must be between {} and {}",
                BCRYPT_MIN_COST,
                BCRYPT_MAX_COST
            ));
        }

        let cw = &self.cloudwatch;
        if cw.instance_id.is_empty() {
            errors.push("cloudwatch.instance_id is not set".to_string());
        } else if !cw.instance_id.starts_with("i-") {
            errors.push(format!("Invalid instance id: {}", cw.instance_id));
        }

        if cw.access_key.is_empty() || cw.secret_key.is_empty() {
            errors.push("cloudwatch credentials are not set".to_string());
        }

        // Region names look like "ap-northeast-2"; reuse the label check
        if !is_valid_domain(&cw.region.replace('-', ".")) {
            errors.push(format!("Invalid region: {}", cw.region));
        }

        if !cw.utc_offset_in_range() {
            errors.push(format!(
                "cloudwatch.utc_offset_hours out of range: {}",
                cw.utc_offset_hours
            ));
        }

        errors
    }

    /// Key/value listing with secrets masked
    pub fn masked_entries(&self) -> Vec<(String, String)> {
        let secret = |v: &str| {
            if v.is_empty() {
                "<not set>".to_string()
            } else {
                mask_sensitive(v, 4)
            }
        };

        vec![
            ("server.host".into(), self.server.host.clone()),
            ("server.port".into(), self.server.port.to_string()),
            ("server.cors".into(), self.server.cors.to_string()),
            (
                "server.admin_token".into(),
                self.server.admin_token.as_deref().map(secret).unwrap_or_else(|| "<not set>".into()),
            ),
            ("database.url".into(), self.database.url.clone()),
            ("database.max_connections".into(), self.database.max_connections.to_string()),
            ("security.bcrypt_cost".into(), self.security.bcrypt_cost.to_string()),
            ("cloudwatch.instance_id".into(), self.cloudwatch.instance_id.clone()),
            ("cloudwatch.access_key".into(), secret(&self.cloudwatch.access_key)),
            ("cloudwatch.secret_key".into(), secret(&self.cloudwatch.secret_key)),
            ("cloudwatch.region".into(), self.cloudwatch.region.clone()),
            ("cloudwatch.namespace".into(), self.cloudwatch.namespace.clone()),
            ("cloudwatch.utc_offset_hours".into(), self.cloudwatch.utc_offset_hours.to_string()),
        ]
    }
}
