use std::path::PathBuf;

use clap::Args;
use object_store_backend::StoreConfig;

use crate::state::{AppConfig, AppState};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Directory holding local buckets (default: <state dir>/buckets)
    #[arg(long, conflicts_with = "s3_bucket")]
    pub local_path: Option<PathBuf>,

    /// Use S3 instead of local storage, exposing these buckets (repeatable)
    #[arg(long = "s3-bucket")]
    pub s3_bucket: Vec<String>,

    /// S3 endpoint URL (e.g. http://localhost:9000 for MinIO)
    #[arg(long, requires = "s3_bucket")]
    pub s3_endpoint: Option<String>,

    /// S3 region
    #[arg(long, requires = "s3_bucket")]
    pub s3_region: Option<String>,

    /// Keys requested per list call
    #[arg(long, default_value_t = common::tree::DEFAULT_PAGE_LIMIT)]
    pub page_limit: usize,

    /// Default log level
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Directory for rolling log files
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] crate::state::StateError),
}

impl Init {
    fn store_config(&self) -> Option<StoreConfig> {
        if !self.s3_bucket.is_empty() {
            // credentials come from AWS_* env vars
            return Some(StoreConfig::S3 {
                endpoint: self.s3_endpoint.clone(),
                region: self.s3_region.clone(),
                access_key: None,
                secret_key: None,
                buckets: self.s3_bucket.clone(),
            });
        }
        self.local_path
            .clone()
            .map(|path| StoreConfig::Local { path })
    }
}

impl crate::op::Op for Init {
    type Error = InitError;
    type Output = String;

    fn execute(&self, ctx: &crate::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            bucket: ctx.bucket.clone(),
            page_limit: self.page_limit,
            log_level: self.log_level.clone(),
            log_dir: self.log_dir.clone(),
            store: self.store_config(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let store = match state.store_config() {
            StoreConfig::Memory { .. } => "memory".to_string(),
            StoreConfig::Local { path } => format!("local ({})", path.display()),
            StoreConfig::S3 { buckets, .. } => format!("s3 ({})", buckets.join(", ")),
        };
        let root = state
            .config
            .bucket
            .clone()
            .unwrap_or_else(|| "all buckets".to_string());

        let output = format!(
            "Initialized s3fsr directory at: {}\n\
             - Config: {}\n\
             - Store: {}\n\
             - Root: {}\n\
             - Page limit: {}",
            state.state_dir.display(),
            state.config_path.display(),
            store,
            root,
            state.config.page_limit,
        );

        Ok(output)
    }
}
