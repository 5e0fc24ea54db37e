//! Offline CSV transfer source
//!
//! Reads the same nine columns the remote query returns. Used for runs
//! without network access and by the test suites.

use crate::errors::FetchResult;
use crate::fetch::TransferSource;
use crate::types::{normalise_address, validate_contract_address, TransferRecord, TransferRow};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Transfer source backed by a CSV export
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_matching(&self, contract: &str, limit: usize) -> FetchResult<Vec<TransferRecord>> {
        let file = File::open(&self.path)?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for row in reader.deserialize::<TransferRow>() {
            if records.len() >= limit {
                break;
            }
            let row = row?;
            if normalise_address(&row.token_address) != contract {
                skipped += 1;
                continue;
            }
            records.push(TransferRecord::try_from(row)?);
        }

        debug!("Skipped {} rows for other token contracts", skipped);
        Ok(records)
    }
}

impl TransferSource for CsvSource {
    async fn fetch(&self, contract: &str, limit: usize) -> FetchResult<Vec<TransferRecord>> {
        let contract = validate_contract_address(contract)?;
        info!(
            "Reading {} transfers from {} (limit {})",
            contract,
            self.path.display(),
            limit
        );

        let records = self.read_matching(&contract, limit)?;
        info!("Finished getting data: {} transfer records", records.len());
        Ok(records)
    }
}

/// Write transfer records in the source CSV layout
pub fn write_transfers_csv(records: &[TransferRecord], path: &Path) -> FetchResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record.to_row())?;
    }
    writer.flush()?;

    info!("Wrote {} transfer records to {}", records.len(), path.display());
    Ok(())
}
