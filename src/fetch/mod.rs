//! Transfer record sources
//!
//! - **BigQuery** - public `token_transfers` table over the REST API
//! - **CSV** - offline export with the same columns
//!
//! Every source validates the contract address before doing any I/O and
//! returns at most `limit` records.

pub mod bigquery;
pub mod credentials;
pub mod csv_source;

pub use bigquery::BigQuerySource;
pub use credentials::Credentials;
pub use csv_source::{write_transfers_csv, CsvSource};

use crate::config::BigQueryConfig;
use crate::errors::FetchResult;
use crate::types::TransferRecord;
use std::path::PathBuf;

/// Anything that can supply the transfers of one token contract
#[allow(async_fn_in_trait)]
pub trait TransferSource {
    async fn fetch(&self, contract: &str, limit: usize) -> FetchResult<Vec<TransferRecord>>;
}

/// Source selected at runtime by the CLI
pub enum AnySource {
    Csv(CsvSource),
    BigQuery(BigQuerySource),
}

impl AnySource {
    /// CSV input when a path is given, the remote table otherwise
    pub fn select(
        input: Option<PathBuf>,
        config: &BigQueryConfig,
        credentials: Credentials,
    ) -> FetchResult<Self> {
        match input {
            Some(path) => Ok(AnySource::Csv(CsvSource::new(path))),
            None => Ok(AnySource::BigQuery(BigQuerySource::new(
                config.clone(),
                credentials,
            )?)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            AnySource::Csv(source) => format!("CSV file {}", source.path().display()),
            AnySource::BigQuery(_) => "BigQuery".to_string(),
        }
    }
}

impl TransferSource for AnySource {
    async fn fetch(&self, contract: &str, limit: usize) -> FetchResult<Vec<TransferRecord>> {
        match self {
            AnySource::Csv(source) => source.fetch(contract, limit).await,
            AnySource::BigQuery(source) => source.fetch(contract, limit).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_prefers_input_file() {
        let source = AnySource::select(
            Some(PathBuf::from("transfers.csv")),
            &BigQueryConfig::default(),
            Credentials::Anonymous { project_id: None },
        )
        .unwrap();
        assert!(matches!(source, AnySource::Csv(_)));
        assert!(source.describe().contains("transfers.csv"));
    }

    #[test]
    fn test_select_remote_without_input() {
        let source = AnySource::select(
            None,
            &BigQueryConfig::default(),
            Credentials::Anonymous { project_id: None },
        )
        .unwrap();
        assert!(matches!(source, AnySource::BigQuery(_)));
    }
}
