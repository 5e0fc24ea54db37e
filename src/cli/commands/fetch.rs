use crate::cli::commands::{load_config, SourceArgs};
use crate::errors::{AppError, AppResult};
use crate::fetch::{write_transfers_csv, TransferSource};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
#[command(author, version, about, long_about = None)]
pub struct FetchCommand {
    #[command(flatten)]
    source: SourceArgs,

    /// CSV file to write the transfer records to
    #[arg(long)]
    output: PathBuf,
}

impl FetchCommand {
    pub async fn run(&self) -> AppResult<()> {
        info!("=== Token Flow Graph - Fetch ===");

        let app_config = load_config()?;
        let limit = self.source.limit(&app_config);
        let source = self.source.source(&app_config)?;

        let records = source
            .fetch(&self.source.contract, limit)
            .await
            .map_err(|e| AppError::in_stage("fetch", e))?;
        write_transfers_csv(&records, &self.output).map_err(|e| AppError::in_stage("fetch", e))?;

        println!("\n=== FETCH COMPLETE ===");
        println!("Transfer records: {}", records.len());
        println!("Saved to: {}", self.output.display());
        Ok(())
    }
}
