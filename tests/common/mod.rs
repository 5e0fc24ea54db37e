//! Common Test Utilities
//!
//! Fixture transfer sets and temporary output locations shared by the
//! unit and integration suites.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use token_flow_graph::fetch::write_transfers_csv;
use token_flow_graph::types::TransferRecord;

/// Contract used by every fixture (BNB token)
pub const CONTRACT: &str = "0xb8c77482e45f1f44de1745f52c74426c631bdd52";

/// Build a transfer of `CONTRACT` with a distinct log index
pub fn transfer(from: &str, to: &str, value: &str, log_index: u64) -> TransferRecord {
    let mut record = TransferRecord::new(from, to, value, &format!("0xtx{:04}", log_index));
    record.token_address = CONTRACT.to_string();
    record.log_index = log_index;
    record.block_number = 6_000_000 + log_index;
    record.block_hash = format!("0xblock{:04}", log_index);
    record
}

/// A→B (10), B→C (5), C→A (missing value)
pub fn triangle_records() -> Vec<TransferRecord> {
    vec![
        transfer("0xA", "0xB", "10", 0),
        transfer("0xB", "0xC", "5", 1),
        transfer("0xC", "0xA", "", 2),
    ]
}

/// Two 4-cliques joined by a single bridge transfer
pub fn two_cliques_records() -> Vec<TransferRecord> {
    let left = ["0x01", "0x02", "0x03", "0x04"];
    let right = ["0x11", "0x12", "0x13", "0x14"];
    let mut records = Vec::new();
    let mut log_index = 0;
    for group in [left, right] {
        for i in 0..group.len() {
            for j in (i + 1)..group.len() {
                records.push(transfer(group[i], group[j], "1", log_index));
                log_index += 1;
            }
        }
    }
    records.push(transfer("0x04", "0x11", "1", log_index));
    records
}

/// Temporary directory that holds test inputs and outputs
pub struct TestOutput {
    dir: TempDir,
}

impl TestOutput {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write records to `name` in the transfer CSV layout
    pub fn write_csv(&self, name: &str, records: &[TransferRecord]) -> anyhow::Result<PathBuf> {
        let path = self.path(name);
        write_transfers_csv(records, &path)?;
        Ok(path)
    }
}
