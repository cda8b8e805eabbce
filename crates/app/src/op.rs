use std::error::Error;
use std::path::PathBuf;

use common::fs::S3Fs;
use object_store_backend::StoreError;

use crate::process::LogConfig;
use crate::state::{AppState, StateError};

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Optional custom state directory (defaults to ~/.s3fsr)
    pub config_path: Option<PathBuf>,
    /// Single bucket to use as the root, overriding the config
    pub bucket: Option<String>,
}

impl OpContext {
    pub fn new(config_path: Option<PathBuf>, bucket: Option<String>) -> Self {
        Self {
            config_path,
            bucket,
        }
    }

    pub fn state(&self) -> Result<AppState, StateError> {
        AppState::load(self.config_path.clone())
    }

    /// Logging settings from the config, or quiet defaults before `init`.
    pub fn log_config(&self) -> LogConfig {
        let Ok(state) = self.state() else {
            return LogConfig::default();
        };
        match state.config.log_level() {
            Ok(level) => LogConfig {
                level,
                log_dir: state.config.log_dir,
            },
            Err(e) => {
                eprintln!("Warning: {}", e);
                LogConfig::default()
            }
        }
    }

    /// Open the configured store and build a fresh filesystem over it.
    pub fn open_fs(&self) -> Result<S3Fs, ContextError> {
        let state = self.state()?;
        let store = state.store_config().open()?;
        let mode = state.root_mode(self.bucket.clone());
        tracing::debug!(?mode, page_limit = state.config.page_limit, "opening filesystem");
        Ok(S3Fs::new(store, mode, state.config.page_limit))
    }
}

pub trait Op {
    type Error: Error + Send + Sync + 'static;
    type Output;

    fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}

#[macro_export]
macro_rules! command_enum {
    ($(($variant:ident, $type:ty)),* $(,)?) => {
        #[derive(Subcommand, Debug, Clone)]
        pub enum Command {
            $($variant($type),)*
        }

        #[derive(Debug)]
        pub enum OpOutput {
            $($variant(<$type as $crate::op::Op>::Output),)*
        }

        #[derive(Debug, thiserror::Error)]
        pub enum OpError {
            $(
                #[error(transparent)]
                $variant(<$type as $crate::op::Op>::Error),
            )*
        }

        impl $crate::op::Op for Command {
            type Output = OpOutput;
            type Error = OpError;

            fn execute(&self, ctx: &$crate::op::OpContext) -> Result<Self::Output, Self::Error> {
                match self {
                    $(
                        Command::$variant(op) => {
                            op.execute(ctx)
                                .map(OpOutput::$variant)
                                .map_err(OpError::$variant)
                        },
                    )*
                }
            }
        }

        impl std::fmt::Display for OpOutput {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        OpOutput::$variant(output) => write!(f, "{}", output),
                    )*
                }
            }
        }
    };
}
