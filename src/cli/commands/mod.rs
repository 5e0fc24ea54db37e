pub mod fetch;
pub mod network;
pub mod stats;

use crate::config::AppConfig;
use crate::errors::{AppError, AppResult};
use crate::fetch::{AnySource, Credentials};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

/// Where transfers come from (shared by every command)
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Token contract address (0x + 40 hex digits)
    pub contract: String,

    /// Maximum number of transfer records (overrides config.toml)
    #[arg(long)]
    pub limit: Option<usize>,

    /// Read transfers from a CSV export instead of BigQuery
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Project that runs the query job (overrides GOOGLE_CLOUD_PROJECT and config.toml)
    #[arg(long)]
    pub project: Option<String>,
}

impl SourceArgs {
    pub fn limit(&self, config: &AppConfig) -> usize {
        self.limit.unwrap_or(config.pipeline.limit)
    }

    /// Build the transfer source; credentials are read from the environment here
    pub fn source(&self, config: &AppConfig) -> AppResult<AnySource> {
        let credentials = Credentials::from_env().with_project_id(self.project.clone());
        if self.input.is_none() && credentials.bearer_token().is_none() {
            warn!("No access token in the environment; querying without authentication");
        }

        let source = AnySource::select(self.input.clone(), &config.bigquery, credentials)?;
        info!("Transfer source: {}", source.describe());
        Ok(source)
    }
}

/// Clap value parser for `--resolution`: a finite number above zero
pub fn parse_resolution(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", raw))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("resolution must be a positive number, got {}", raw))
    }
}

/// Load configuration, mapping failures to a config error
pub fn load_config() -> AppResult<AppConfig> {
    match AppConfig::load() {
        Ok(config) => {
            info!("Configuration loaded successfully");
            Ok(config)
        }
        Err(e) => {
            warn!("Failed to load configuration: {}", e);
            Err(AppError::Config(format!(
                "Configuration error: {}. Check config.toml and TOKEN_FLOW_* environment variables",
                e
            )))
        }
    }
}
