use crate::cli::commands::{load_config, parse_resolution, SourceArgs};
use crate::errors::{AppError, AppResult};
use crate::fetch::TransferSource;
use crate::graph::{build_graph, partition_graph, PartitionConfig};
use crate::types::TransferRecord;
use crate::utils::time::timestamp_to_iso;
use clap::Args;
use tracing::info;

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct StatsCommand {
    #[command(flatten)]
    source: SourceArgs,

    /// Seed for community detection (overrides config.toml)
    #[arg(long)]
    seed: Option<u64>,

    /// Modularity resolution (overrides config.toml)
    #[arg(long, value_parser = parse_resolution)]
    resolution: Option<f64>,

    /// Number of communities to list
    #[arg(long, default_value = "10")]
    top: usize,
}

impl StatsCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== Token Flow Graph - Statistics ===");

        let app_config = load_config()?;
        let limit = self.source.limit(&app_config);
        let source = self.source.source(&app_config)?;

        let records = source
            .fetch(&self.source.contract, limit)
            .await
            .map_err(|e| AppError::in_stage("fetch", e))?;
        let (graph, statistics) =
            build_graph(&records).map_err(|e| AppError::in_stage("build", e))?;

        let config = PartitionConfig {
            resolution: self.resolution.unwrap_or(app_config.pipeline.resolution),
            seed: self.seed.unwrap_or(app_config.pipeline.seed),
            ..PartitionConfig::default()
        };
        let partition =
            partition_graph(&graph, &config).map_err(|e| AppError::in_stage("partition", e))?;

        println!("\n=== TRANSFER GRAPH STATISTICS ===");
        println!("Contract: {}", self.source.contract.trim().to_lowercase());
        println!("Transfer records: {}", records.len());
        if let Some((first, last)) = block_time_range(&records) {
            println!("Block time range: {} to {}", first, last);
        }
        println!("Nodes: {}", statistics.nodes);
        println!("Edges: {}", statistics.edges);
        println!("Density: {:.6}", statistics.density);
        println!("Mean degree: {:.4}", statistics.mean_degree);
        println!("Unparsed values: {}", statistics.unparsed_values);
        println!(
            "Communities: {} (modularity {:.4})",
            partition.community_count(),
            partition.modularity()
        );

        let summaries = partition.summaries();
        if !summaries.is_empty() {
            println!("\nLargest communities:");
            for summary in summaries.iter().take(self.top) {
                println!(
                    "  #{:<4} {:>6} nodes ({:>5.1}%)  {}  e.g. {}",
                    summary.community,
                    summary.size,
                    summary.percentage_of_nodes,
                    summary.colour,
                    summary.representative
                );
            }
        }
        Ok(())
    }
}

/// Earliest and latest block time among records that carry one
fn block_time_range(records: &[TransferRecord]) -> Option<(String, String)> {
    let mut timestamps = records
        .iter()
        .filter_map(|r| r.block_timestamp.map(|ts| ts.timestamp()));
    let first = timestamps.next()?;
    let (min, max) = timestamps.fold((first, first), |(lo, hi), ts| (lo.min(ts), hi.max(ts)));
    Some((timestamp_to_iso(min), timestamp_to_iso(max)))
}
