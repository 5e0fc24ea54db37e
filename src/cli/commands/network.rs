use crate::cli::commands::{load_config, parse_resolution, SourceArgs};
use crate::errors::AppResult;
use crate::export::ImageOptions;
use crate::pipeline::{run_pipeline, AnalysisOptions, PipelineOptions};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct NetworkCommand {
    #[command(flatten)]
    source: SourceArgs,

    /// Seed for community detection and layout (overrides config.toml)
    #[arg(long)]
    seed: Option<u64>,

    /// Modularity resolution; higher values give smaller communities
    #[arg(long, value_parser = parse_resolution)]
    resolution: Option<f64>,

    /// PNG output path (overrides config.toml)
    #[arg(long)]
    image: Option<PathBuf>,

    /// JSON output path (overrides config.toml)
    #[arg(long)]
    json: Option<PathBuf>,

    /// Image width in pixels (overrides config.toml)
    #[arg(long)]
    width: Option<u32>,

    /// Image height in pixels (overrides config.toml)
    #[arg(long)]
    height: Option<u32>,

    /// Only write the JSON document
    #[arg(long)]
    no_image: bool,
}

impl NetworkCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== Token Flow Graph - Network ===");

        let app_config = load_config()?;

        // CLI arguments override config values
        let image = (!self.no_image).then(|| ImageOptions {
            path: self
                .image
                .clone()
                .unwrap_or_else(|| app_config.output.image_path.clone()),
            width: self.width.unwrap_or(app_config.output.width),
            height: self.height.unwrap_or(app_config.output.height),
        });

        let options = PipelineOptions {
            contract: self.source.contract.clone(),
            limit: self.source.limit(&app_config),
            analysis: AnalysisOptions {
                seed: self.seed.unwrap_or(app_config.pipeline.seed),
                resolution: self.resolution.unwrap_or(app_config.pipeline.resolution),
                layout_iterations: app_config.pipeline.layout_iterations,
            },
            image,
            json_path: self
                .json
                .clone()
                .unwrap_or_else(|| app_config.output.json_path.clone()),
        };

        info!("Configuration:");
        info!("  Contract: {}", options.contract);
        info!("  Limit: {}", options.limit);
        info!("  Seed: {}", options.analysis.seed);
        info!("  Resolution: {}", options.analysis.resolution);
        info!("  JSON: {}", options.json_path.display());
        if let Some(image) = &options.image {
            info!(
                "  Image: {} ({}x{})",
                image.path.display(),
                image.width,
                image.height
            );
        }

        let source = self.source.source(&app_config)?;
        let report = run_pipeline(&source, &options).await?;
        report.print_summary();
        Ok(())
    }
}
