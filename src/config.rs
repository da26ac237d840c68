use crate::constants;
use crate::error::{EtlError, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub postgresql: PostgresConfig,
    #[serde(default)]
    pub etl: EtlSettings,
    #[serde(default)]
    pub sqlite: Option<SqliteConfig>,
}

/// Connection parameters for the `[postgresql]` section.
#[derive(Clone, Deserialize)]
pub struct PostgresConfig {
    pub host: String,
    pub database: String,
    pub user: String,
    pub password: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

// Keep the password out of log output.
impl fmt::Debug for PostgresConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConfig")
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EtlSettings {
    /// Schema generation fixed for this deployment (`v1` or `v2`)
    pub schema: String,
    pub input: String,
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub backend: String,
}

impl Default for EtlSettings {
    fn default() -> Self {
        Self {
            schema: constants::SCHEMA_V1.to_string(),
            input: constants::DEFAULT_INPUT_FILE.to_string(),
            data_dir: PathBuf::from(constants::DEFAULT_DATA_DIR),
            log_dir: PathBuf::from(constants::DEFAULT_LOG_DIR),
            backend: constants::BACKEND_POSTGRESQL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SqliteConfig {
    pub path: PathBuf,
}

fn default_port() -> u16 {
    constants::DEFAULT_POSTGRES_PORT
}

impl Config {
    /// Load from `$EMPLOYEE_ETL_CONFIG`, falling back to `config/config.toml`.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(constants::CONFIG_PATH_ENV)
            .unwrap_or_else(|_| constants::DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(config_path)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_content = fs::read_to_string(path).map_err(|e| {
            EtlError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !constants::get_supported_schemas().contains(&self.etl.schema.as_str()) {
            return Err(EtlError::Config(format!(
                "Unknown schema generation '{}' (expected one of: {})",
                self.etl.schema,
                constants::get_supported_schemas().join(", ")
            )));
        }

        match self.etl.backend.as_str() {
            constants::BACKEND_POSTGRESQL => Ok(()),
            constants::BACKEND_SQLITE if self.sqlite.is_some() => Ok(()),
            constants::BACKEND_SQLITE => Err(EtlError::Config(
                "backend 'sqlite' requires a [sqlite] section with a path".to_string(),
            )),
            other => Err(EtlError::Config(format!("Unknown backend '{other}'"))),
        }
    }

    /// Input file resolved against the data directory. Absolute inputs are used as-is.
    pub fn input_path(&self) -> PathBuf {
        self.etl.data_dir.join(&self.etl.input)
    }
}
