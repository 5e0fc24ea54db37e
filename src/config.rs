use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration loaded from config.toml or environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub bigquery: BigQueryConfig,
    pub pipeline: PipelineConfig,
    pub output: OutputConfig,
}

/// Remote transfer table query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BigQueryConfig {
    pub endpoint: String,
    #[serde(default)]
    pub project_id: Option<String>,
    pub table: String,
    pub timeout_seconds: u64,
}

impl Default for BigQueryConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://bigquery.googleapis.com/bigquery/v2".to_string(),
            project_id: None,
            table: "bigquery-public-data.ethereum_blockchain.token_transfers".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Graph analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub limit: usize,
    pub seed: u64,
    pub layout_iterations: usize,
    pub resolution: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            limit: 1000,
            seed: 42,
            layout_iterations: 50,
            resolution: 1.0,
        }
    }
}

/// Artifact locations and image size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub image_path: PathBuf,
    pub json_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from("network.png"),
            json_path: PathBuf::from("network.json"),
            width: 2000,
            height: 2000,
        }
    }
}

impl AppConfig {
    /// Load configuration from config.toml file and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load using a specific config file base name (extension optional)
    pub fn load_from(file: &str) -> Result<Self, ConfigError> {
        let bigquery = BigQueryConfig::default();
        let pipeline = PipelineConfig::default();
        let output = OutputConfig::default();

        let config = Config::builder()
            // Start with default values
            .set_default("bigquery.endpoint", bigquery.endpoint)?
            .set_default("bigquery.table", bigquery.table)?
            .set_default("bigquery.timeout_seconds", bigquery.timeout_seconds)?
            .set_default("pipeline.limit", pipeline.limit as i64)?
            .set_default("pipeline.seed", pipeline.seed)?
            .set_default("pipeline.layout_iterations", pipeline.layout_iterations as i64)?
            .set_default("pipeline.resolution", pipeline.resolution)?
            .set_default("output.image_path", path_default(&output.image_path))?
            .set_default("output.json_path", path_default(&output.json_path))?
            .set_default("output.width", output.width as i64)?
            .set_default("output.height", output.height as i64)?
            // Load from config.toml if it exists
            .add_source(File::with_name(file).required(false))
            // TOKEN_FLOW_PIPELINE__SEED=7 overrides pipeline.seed
            .add_source(
                Environment::with_prefix("TOKEN_FLOW")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bigquery.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "bigquery.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.pipeline.limit == 0 {
            return Err(ConfigError::Message(
                "pipeline.limit must be greater than zero".to_string(),
            ));
        }
        if !(self.pipeline.resolution > 0.0) {
            return Err(ConfigError::Message(
                "pipeline.resolution must be a positive number".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bigquery: BigQueryConfig::default(),
            pipeline: PipelineConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

fn path_default(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}
