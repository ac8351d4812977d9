use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct EmbedConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub storage: StorageConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// JSON seed file for the in-memory backend.
    pub seed_path: Option<String>,
    pub mongodb: Option<MongoConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// HS256 secret shared with the application that logs viewers in.
    pub secret: Secret<String>,
    pub expiry_minutes: i64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Mongodb,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "mongodb" | "mongo" => Ok(StorageBackend::Mongodb),
            _ => Err(format!("Invalid storage backend: {}", s)),
        }
    }
}

impl EmbedConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env and APP__ prefix)
        let common_config = core_config::Config::load()?;

        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let backend: StorageBackend = get_env("STORAGE_BACKEND", Some("memory"), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let mongodb = match backend {
            StorageBackend::Mongodb => Some(MongoConfig {
                uri: get_env("MONGODB_URI", None, is_prod)?,
                database: get_env("MONGODB_DATABASE", Some("embed_db"), is_prod)?,
            }),
            StorageBackend::Memory => None,
        };

        let expiry_minutes = get_env("SESSION_EXPIRY_MINUTES", Some("60"), false)?
            .parse::<i64>()
            .map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("Invalid SESSION_EXPIRY_MINUTES: {}", e))
            })?;

        Ok(EmbedConfig {
            common: common_config,
            storage: StorageConfig {
                backend,
                seed_path: env::var("EMBED_SEED_PATH").ok(),
                mongodb,
            },
            session: SessionConfig {
                secret: Secret::new(get_env(
                    "SESSION_SECRET",
                    Some("dev-session-secret"),
                    is_prod,
                )?),
                expiry_minutes,
            },
        })
    }
}

/// Reads `key`, falling back to `default` outside production.
fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}
