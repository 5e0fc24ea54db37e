//! BigQuery REST transfer source
//!
//! Runs one synchronous `jobs.query` request against the public token
//! transfer table. The contract address travels as a named query
//! parameter; the HTTP client carries the configured timeout so a stuck
//! query fails instead of hanging.

use crate::config::BigQueryConfig;
use crate::errors::{FetchError, FetchResult};
use crate::fetch::{Credentials, TransferSource};
use crate::types::{validate_contract_address, TransferRecord, TransferRow, TRANSFER_COLUMNS};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const OPERATION: &str = "jobs.query";

/// Longest error body excerpt kept in error messages
const MAX_ERROR_BODY: usize = 512;

/// `jobs.query` response (only the fields used here)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub job_complete: bool,
    pub schema: Option<TableSchema>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    pub page_token: Option<String>,
    pub total_rows: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TableSchema {
    pub fields: Vec<TableField>,
}

#[derive(Debug, Deserialize)]
pub struct TableField {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TableRow {
    pub f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
pub struct TableCell {
    pub v: Option<Value>,
}

/// Transfer source backed by the BigQuery REST API
pub struct BigQuerySource {
    client: reqwest::Client,
    config: BigQueryConfig,
    credentials: Credentials,
}

impl BigQuerySource {
    pub fn new(config: BigQueryConfig, credentials: Credentials) -> FetchResult<Self> {
        validate_table_name(&config.table)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    fn queries_url(&self) -> FetchResult<String> {
        let project = self
            .credentials
            .project_id()
            .or(self.config.project_id.as_deref())
            .ok_or(FetchError::MissingProject)?;

        Ok(format!(
            "{}/projects/{}/queries",
            self.config.endpoint.trim_end_matches('/'),
            project
        ))
    }

    fn timeout_error(&self) -> FetchError {
        FetchError::Timeout {
            timeout_seconds: self.config.timeout_seconds,
            operation: OPERATION.to_string(),
        }
    }
}

impl TransferSource for BigQuerySource {
    async fn fetch(&self, contract: &str, limit: usize) -> FetchResult<Vec<TransferRecord>> {
        let contract = validate_contract_address(contract)?;
        let url = self.queries_url()?;
        let body = build_query_request(
            &self.config.table,
            &contract,
            limit,
            self.config.timeout_seconds,
        );

        info!("Querying {} transfers for {} (limit {})", self.config.table, contract, limit);
        debug!("POST {}", url);

        let mut request = self.client.post(&url).json(&body);
        if let Some(token) = self.credentials.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                FetchError::from(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message: String = text.chars().take(MAX_ERROR_BODY).collect();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FetchError::Auth {
                    status: status.as_u16(),
                    message,
                },
                _ => FetchError::QueryFailed {
                    status: status.as_u16(),
                    message,
                },
            });
        }

        let parsed: QueryResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.timeout_error()
            } else {
                FetchError::InvalidResponse(e.to_string())
            }
        })?;

        if !parsed.job_complete {
            return Err(self.timeout_error());
        }

        let records = decode_query_response(parsed)?;
        info!("Finished getting data: {} transfer records", records.len());
        Ok(records)
    }
}

/// Table names are interpolated into SQL, so only identifier characters are allowed
fn validate_table_name(table: &str) -> FetchResult<()> {
    let valid = !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(FetchError::InvalidResponse(format!(
            "Refusing to query invalid table name '{}'",
            table
        )))
    }
}

/// Build the `jobs.query` request body
pub fn build_query_request(table: &str, contract: &str, limit: usize, timeout_seconds: u64) -> Value {
    let query = format!(
        "SELECT {} FROM `{}` WHERE token_address = @contract LIMIT {}",
        TRANSFER_COLUMNS.join(", "),
        table,
        limit
    );

    json!({
        "query": query,
        "useLegacySql": false,
        "parameterMode": "NAMED",
        "queryParameters": [{
            "name": "contract",
            "parameterType": { "type": "STRING" },
            "parameterValue": { "value": contract }
        }],
        "maxResults": limit,
        "timeoutMs": timeout_seconds * 1000,
    })
}

/// Decode `schema` + `rows` of a completed query into transfer records
pub fn decode_query_response(response: QueryResponse) -> FetchResult<Vec<TransferRecord>> {
    if response.page_token.is_some() {
        warn!(
            "Query returned more rows than one page ({} total); only the first page is used",
            response.total_rows.as_deref().unwrap_or("unknown")
        );
    }

    if response.rows.is_empty() {
        return Ok(Vec::new());
    }

    let schema = response
        .schema
        .ok_or_else(|| FetchError::InvalidResponse("Rows returned without a schema".to_string()))?;

    let positions: HashMap<&str, usize> = schema
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| (field.name.as_str(), i))
        .collect();

    for column in TRANSFER_COLUMNS {
        if !positions.contains_key(column) {
            return Err(FetchError::InvalidResponse(format!(
                "Result schema is missing column '{}'",
                column
            )));
        }
    }

    response
        .rows
        .iter()
        .map(|row| {
            let cell = |column: &str| -> Option<String> {
                row.f
                    .get(positions[column])
                    .and_then(|cell| cell.v.as_ref())
                    .and_then(value_to_string)
            };

            let transfer = TransferRow {
                token_address: cell("token_address").unwrap_or_default(),
                from_address: cell("from_address").unwrap_or_default(),
                to_address: cell("to_address").unwrap_or_default(),
                value: cell("value"),
                transaction_hash: cell("transaction_hash").unwrap_or_default(),
                log_index: cell("log_index").unwrap_or_default(),
                block_timestamp: cell("block_timestamp"),
                block_number: cell("block_number").unwrap_or_default(),
                block_hash: cell("block_hash").unwrap_or_default(),
            };
            TransferRecord::try_from(transfer)
        })
        .collect()
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
