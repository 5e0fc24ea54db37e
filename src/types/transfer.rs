//! Token transfer records
//!
//! `TransferRow` mirrors the column layout of the public `token_transfers`
//! table (and of CSV exports of it). `TransferRecord` is the parsed,
//! immutable form consumed by the graph builder.

use crate::errors::{FetchError, FetchResult};
use crate::utils::time::parse_block_timestamp;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Column names of the transfer table, in export order
pub const TRANSFER_COLUMNS: [&str; 9] = [
    "token_address",
    "from_address",
    "to_address",
    "value",
    "transaction_hash",
    "log_index",
    "block_timestamp",
    "block_number",
    "block_hash",
];

/// Raw transfer row - matches the exact table/CSV structure, all strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferRow {
    pub token_address: String,
    pub from_address: String,
    pub to_address: String,
    #[serde(default)]
    pub value: Option<String>,
    pub transaction_hash: String,
    pub log_index: String,
    #[serde(default)]
    pub block_timestamp: Option<String>,
    pub block_number: String,
    #[serde(default)]
    pub block_hash: String,
}

/// Parsed transfer value
///
/// Token amounts are kept as arbitrary-precision decimals in raw token
/// units. Rows whose value is absent or unparseable are kept (they still
/// form an edge) but carry no amount.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferValue {
    Amount(BigDecimal),
    Missing,
    Invalid(String),
}

impl TransferValue {
    /// Parse a raw value column
    ///
    /// Only plain decimals (digits with an optional fraction) are amounts;
    /// signs and exponent notation are invalid, which also bounds the digit
    /// count of every amount by the length of its column.
    pub fn parse(raw: Option<&str>) -> Self {
        let trimmed = match raw.map(str::trim) {
            None | Some("") => return TransferValue::Missing,
            Some(s) => s,
        };

        if !is_plain_decimal(trimmed) {
            return TransferValue::Invalid(trimmed.to_string());
        }

        match BigDecimal::from_str(trimmed) {
            Ok(amount) => TransferValue::Amount(amount),
            _ => TransferValue::Invalid(trimmed.to_string()),
        }
    }

    pub fn amount(&self) -> Option<&BigDecimal> {
        match self {
            TransferValue::Amount(amount) => Some(amount),
            _ => None,
        }
    }

    pub fn is_amount(&self) -> bool {
        matches!(self, TransferValue::Amount(_))
    }
}

/// `123` or `123.45`; no sign, no exponent
fn is_plain_decimal(raw: &str) -> bool {
    let digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    match raw.split_once('.') {
        Some((integer, fraction)) => digits(integer) && digits(fraction),
        None => digits(raw),
    }
}

impl fmt::Display for TransferValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferValue::Amount(amount) => write!(f, "{}", amount),
            TransferValue::Missing => Ok(()),
            TransferValue::Invalid(raw) => write!(f, "{}", raw),
        }
    }
}

/// A single token transfer event
#[derive(Debug, Clone, PartialEq)]
pub struct TransferRecord {
    pub token_address: String,
    pub from_address: String,
    pub to_address: String,
    pub value: TransferValue,
    pub transaction_hash: String,
    pub log_index: u64,
    pub block_timestamp: Option<DateTime<Utc>>,
    pub block_number: u64,
    pub block_hash: String,
}

impl TransferRecord {
    /// Convenience constructor used by fixtures and offline tooling
    pub fn new(from: &str, to: &str, value: &str, transaction_hash: &str) -> Self {
        Self {
            token_address: String::new(),
            from_address: normalise_address(from),
            to_address: normalise_address(to),
            value: TransferValue::parse(Some(value)),
            transaction_hash: transaction_hash.to_string(),
            log_index: 0,
            block_timestamp: None,
            block_number: 0,
            block_hash: String::new(),
        }
    }

    /// Convert back to the raw row layout for CSV export
    pub fn to_row(&self) -> TransferRow {
        let value = match &self.value {
            TransferValue::Missing => None,
            other => Some(other.to_string()),
        };

        TransferRow {
            token_address: self.token_address.clone(),
            from_address: self.from_address.clone(),
            to_address: self.to_address.clone(),
            value,
            transaction_hash: self.transaction_hash.clone(),
            log_index: self.log_index.to_string(),
            block_timestamp: self
                .block_timestamp
                .map(|ts| ts.format("%Y-%m-%d %H:%M:%S%.f UTC").to_string()),
            block_number: self.block_number.to_string(),
            block_hash: self.block_hash.clone(),
        }
    }
}

impl TryFrom<TransferRow> for TransferRecord {
    type Error = FetchError;

    fn try_from(row: TransferRow) -> FetchResult<Self> {
        let log_index = parse_integer_column("log_index", &row.log_index)?;
        let block_number = parse_integer_column("block_number", &row.block_number)?;

        let block_timestamp = match row.block_timestamp.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_block_timestamp(raw).ok_or_else(|| {
                FetchError::InvalidResponse(format!("Unparseable block_timestamp: {}", raw))
            })?),
        };

        if row.from_address.trim().is_empty() || row.to_address.trim().is_empty() {
            return Err(FetchError::InvalidResponse(format!(
                "Transfer {}:{} is missing an endpoint address",
                row.transaction_hash, row.log_index
            )));
        }

        Ok(Self {
            token_address: normalise_address(&row.token_address),
            from_address: normalise_address(&row.from_address),
            to_address: normalise_address(&row.to_address),
            value: TransferValue::parse(row.value.as_deref()),
            transaction_hash: row.transaction_hash,
            log_index,
            block_timestamp,
            block_number,
            block_hash: row.block_hash,
        })
    }
}

fn parse_integer_column(column: &str, raw: &str) -> FetchResult<u64> {
    raw.trim().parse::<u64>().map_err(|_| {
        FetchError::InvalidResponse(format!("Column {} is not an integer: '{}'", column, raw))
    })
}

/// Lower-case and trim an address
pub fn normalise_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Normalise a contract address and check it is `0x` followed by 20 hex-encoded bytes
pub fn validate_contract_address(address: &str) -> FetchResult<String> {
    let normalised = normalise_address(address);
    let invalid = || FetchError::InvalidAddress {
        address: address.to_string(),
    };

    let digits = normalised.strip_prefix("0x").ok_or_else(invalid)?;
    let bytes = hex::decode(digits).map_err(|_| invalid())?;
    if bytes.len() != 20 {
        return Err(invalid());
    }

    Ok(normalised)
}
