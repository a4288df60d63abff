/// Server configuration
use crate::error::{Result, ServerError};
use crate::services::auth::MAX_TOKEN_LIFETIME_HOURS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,

    #[serde(default = "default_auth")]
    pub auth: AuthSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    #[serde(default = "default_thumbnail_path")]
    pub thumbnail_path: PathBuf,

    #[serde(default = "default_max_thumbnail_bytes")]
    pub max_thumbnail_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthSettings {
    #[serde(default)]
    pub jwt_secret: String,

    #[serde(default = "default_jwt_expiration_hours")]
    pub jwt_expiration_hours: u64,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` overrides the default `config.toml` lookup. Environment variables
    /// use the `CHORUS_` prefix and `__` between nesting levels, e.g.
    /// `CHORUS_AUTH__JWT_SECRET`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        let config_path = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        if config_path.exists() {
            settings = settings.add_source(config::File::from(config_path));
        } else if path.is_some() {
            return Err(ServerError::Config(format!(
                "Config file not found: {}",
                config_path.display()
            )));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CHORUS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.is_empty() {
            return Err(ServerError::Config(
                "JWT secret is required (set CHORUS_AUTH__JWT_SECRET)".to_string(),
            ));
        }

        if !(1..=MAX_TOKEN_LIFETIME_HOURS).contains(&self.auth.jwt_expiration_hours) {
            return Err(ServerError::Config(format!(
                "auth.jwt_expiration_hours must be between 1 and {MAX_TOKEN_LIFETIME_HOURS}"
            )));
        }

        if self.storage.max_thumbnail_bytes == 0 {
            return Err(ServerError::Config(
                "storage.max_thumbnail_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        database_url: default_database_url(),
        thumbnail_path: default_thumbnail_path(),
        max_thumbnail_bytes: default_max_thumbnail_bytes(),
    }
}

fn default_database_url() -> String {
    "sqlite://./data/chorus.db".to_string()
}

fn default_thumbnail_path() -> PathBuf {
    PathBuf::from("./data/thumbnails")
}

fn default_max_thumbnail_bytes() -> usize {
    5 * 1024 * 1024
}

fn default_auth() -> AuthSettings {
    AuthSettings {
        jwt_secret: String::new(),
        jwt_expiration_hours: default_jwt_expiration_hours(),
    }
}

fn default_jwt_expiration_hours() -> u64 {
    24
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            storage: default_storage(),
            auth: default_auth(),
        }
    }
}
