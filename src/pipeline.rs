//! Pipeline orchestration
//!
//! fetch → build → partition → layout → render model → image/JSON.
//! Every stage consumes the previous stage's output by reference and
//! errors are tagged with the stage name before they reach the caller.
//! Artifacts already written when a later stage fails stay on disk.

use crate::errors::{AppError, AppResult};
use crate::export::{build_render_model, render_png, write_render_model, ImageOptions};
use crate::fetch::TransferSource;
use crate::graph::{
    build_graph, partition_graph, spring_layout, Layout, LayoutConfig, Partition,
    PartitionConfig, TransferGraph,
};
use crate::types::{GraphStatistics, RenderModel, TimingInfo, TransferRecord};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Graph analysis parameters
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub seed: u64,
    pub resolution: f64,
    pub layout_iterations: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            seed: 42,
            resolution: 1.0,
            layout_iterations: 50,
        }
    }
}

impl AnalysisOptions {
    fn partition_config(&self) -> PartitionConfig {
        PartitionConfig {
            resolution: self.resolution,
            seed: self.seed,
            ..PartitionConfig::default()
        }
    }

    fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            iterations: self.layout_iterations,
            seed: self.seed,
            ..LayoutConfig::default()
        }
    }
}

/// Full run parameters
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub contract: String,
    pub limit: usize,
    pub analysis: AnalysisOptions,
    /// `None` skips the PNG
    pub image: Option<ImageOptions>,
    pub json_path: PathBuf,
}

/// Output of the in-memory stages
#[derive(Debug)]
pub struct Analysis {
    pub graph: TransferGraph,
    pub statistics: GraphStatistics,
    pub partition: Partition,
    pub layout: Layout,
    pub model: RenderModel,
}

/// Stage timings and artifact locations of a finished run
#[derive(Debug)]
pub struct PipelineReport {
    pub records: usize,
    pub statistics: GraphStatistics,
    pub community_count: u32,
    pub modularity: f64,
    pub image_path: Option<PathBuf>,
    pub json_path: PathBuf,
    pub stage_durations: Vec<(&'static str, Duration)>,
    pub total_duration: Duration,
}

impl PipelineReport {
    pub fn print_summary(&self) {
        println!("\n=== TOKEN FLOW GRAPH COMPLETE ===");
        println!("Transfer records: {}", self.records);
        println!("{}", self.statistics.summary());
        println!(
            "Communities: {} (modularity {:.4})",
            self.community_count, self.modularity
        );
        if let Some(path) = &self.image_path {
            println!("Image: {}", path.display());
        }
        println!("JSON: {}", self.json_path.display());
        for (stage, duration) in &self.stage_durations {
            println!("  {:<10} {:.2}s", stage, duration.as_secs_f64());
        }
        println!("Total time: {:.2}s", self.total_duration.as_secs_f64());
    }
}

/// Build, partition and lay out a set of transfers
pub fn analyse(records: &[TransferRecord], options: &AnalysisOptions) -> AppResult<Analysis> {
    let (graph, statistics) = build_graph(records).map_err(|e| AppError::in_stage("build", e))?;
    let partition = partition_graph(&graph, &options.partition_config())
        .map_err(|e| AppError::in_stage("partition", e))?;
    let layout = spring_layout(&graph, &options.layout_config())
        .map_err(|e| AppError::in_stage("layout", e))?;
    let model = build_render_model(&graph, &partition, &layout)
        .map_err(|e| AppError::in_stage("render", e))?;

    Ok(Analysis {
        graph,
        statistics,
        partition,
        layout,
        model,
    })
}

/// Run every stage against `source` and write the artifacts
pub async fn run_pipeline<S: TransferSource>(
    source: &S,
    options: &PipelineOptions,
) -> AppResult<PipelineReport> {
    let mut total = TimingInfo::new();
    let mut stage_durations = Vec::new();

    let mut timing = TimingInfo::new();
    let records = source
        .fetch(&options.contract, options.limit)
        .await
        .map_err(|e| AppError::in_stage("fetch", e))?;
    timing.finish();
    stage_durations.push(("fetch", timing.elapsed()));

    let mut timing = TimingInfo::new();
    let analysis = analyse(&records, &options.analysis)?;
    timing.finish();
    stage_durations.push(("analyse", timing.elapsed()));

    let image_path = match &options.image {
        Some(image) => {
            let mut timing = TimingInfo::new();
            render_png(&analysis.graph, &analysis.partition, &analysis.layout, image)
                .map_err(|e| AppError::in_stage("image", e))?;
            timing.finish();
            stage_durations.push(("image", timing.elapsed()));
            Some(image.path.clone())
        }
        None => {
            info!("Image rendering disabled");
            None
        }
    };

    let mut timing = TimingInfo::new();
    write_render_model(&analysis.model, &options.json_path)
        .map_err(|e| AppError::in_stage("json", e))?;
    timing.finish();
    stage_durations.push(("json", timing.elapsed()));

    total.finish();
    Ok(PipelineReport {
        records: records.len(),
        statistics: analysis.statistics,
        community_count: analysis.partition.community_count(),
        modularity: analysis.partition.modularity(),
        image_path,
        json_path: options.json_path.clone(),
        stage_durations,
        total_duration: total.elapsed(),
    })
}
