use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum AppError {
    /// Transfer record retrieval
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Graph construction and analysis
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Artifact output (image, JSON)
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pipeline stage failed; `stage` names which one
    #[error("Stage '{stage}' failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Tag an error with the pipeline stage that produced it
    pub fn in_stage(stage: &'static str, err: impl Into<AppError>) -> Self {
        AppError::Stage {
            stage,
            source: Box::new(err.into()),
        }
    }

    /// Name of the failing stage, if this error came out of the pipeline
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            AppError::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }
}

/// Errors raised by transfer sources
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure (DNS, TLS, connection reset, ...)
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Remote query did not finish within the configured duration
    #[error("Request timeout: {timeout_seconds}s for {operation}")]
    Timeout {
        timeout_seconds: u64,
        operation: String,
    },

    /// Credentials were rejected by the data source
    #[error("Authentication failed (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    /// Data source answered with a non-success status
    #[error("Query failed (HTTP {status}): {message}")]
    QueryFailed { status: u16, message: String },

    /// Response body could not be decoded into transfer records
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No project to run the query job under
    #[error("No project id configured for the query job")]
    MissingProject,

    /// Contract address is not a 20-byte hex address
    #[error("Invalid contract address: {address}")]
    InvalidAddress { address: String },

    /// Offline CSV source errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building or analysing the transfer graph
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    /// Zero transfer records were supplied
    #[error("No transfer records to build a graph from")]
    EmptyInput,

    /// Operation requires at least one node
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Node has no layout coordinate (pipeline bug)
    #[error("Node {node} has no layout position")]
    MissingLayout { node: String },

    /// Node has no community assignment (pipeline bug)
    #[error("Node {node} has no community assignment")]
    MissingPartition { node: String },
}

/// Errors raised while writing artifacts
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Plotting backend failure
    #[error("Render error: {0}")]
    Render(String),
}

/// Application-wide result type - single point of truth
pub type AppResult<T> = Result<T, AppError>;

/// Result type for transfer sources
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Result type for artifact writers
pub type ExportResult<T> = Result<T, ExportError>;

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err.to_string())
    }
}
