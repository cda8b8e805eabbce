use std::{fs, path::PathBuf, str::FromStr};

use common::tree::{RootMode, DEFAULT_PAGE_LIMIT};
use object_store_backend::StoreConfig;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "s3fsr";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const BUCKETS_DIR_NAME: &str = "buckets";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Expose a single bucket as the root instead of the bucket list
    #[serde(default)]
    pub bucket: Option<String>,
    /// Keys requested per list call
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,
    /// Default log level (overridden by RUST_LOG)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Directory for daily rolling log files (optional)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Backing store (defaults to local buckets under the state directory)
    #[serde(default)]
    pub store: Option<StoreConfig>,
}

fn default_page_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            page_limit: default_page_limit(),
            log_level: default_log_level(),
            log_dir: None,
            store: None,
        }
    }
}

impl AppConfig {
    pub fn log_level(&self) -> Result<tracing::Level, StateError> {
        tracing::Level::from_str(&self.log_level)
            .map_err(|_| StateError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the state directory (~/.s3fsr)
    pub state_dir: PathBuf,
    /// Default root for local buckets
    pub buckets_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the state directory path (custom or default ~/.s3fsr)
    pub fn state_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;

        if state_dir.join(CONFIG_FILE_NAME).exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&state_dir)?;

        let buckets_path = state_dir.join(BUCKETS_DIR_NAME);
        fs::create_dir_all(&buckets_path)?;

        // the store location is fixed at init
        let mut config = config.unwrap_or_default();
        if config.store.is_none() {
            config.store = Some(StoreConfig::Local {
                path: buckets_path.clone(),
            });
        }
        config.log_level()?;

        let config_path = state_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        Ok(Self {
            state_dir,
            buckets_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the state directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let state_dir = Self::state_dir(custom_path)?;

        if !state_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let buckets_path = state_dir.join(BUCKETS_DIR_NAME);
        let config_path = state_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            state_dir,
            buckets_path,
            config_path,
            config,
        })
    }

    /// The configured store, or local buckets under the state directory.
    pub fn store_config(&self) -> StoreConfig {
        self.config
            .store
            .clone()
            .unwrap_or_else(|| StoreConfig::Local {
                path: self.buckets_path.clone(),
            })
    }

    /// What the filesystem root shows; `bucket` overrides the config.
    pub fn root_mode(&self, bucket: Option<String>) -> RootMode {
        match bucket.or_else(|| self.config.bucket.clone()) {
            Some(bucket) => RootMode::Bucket(bucket),
            None => RootMode::Buckets,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("s3fsr directory not initialized. Run 's3fsr init' first")]
    NotInitialized,

    #[error("s3fsr directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
