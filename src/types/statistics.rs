//! Graph and run statistics

use serde::Serialize;
use std::time::{Duration, Instant};

/// Read-only snapshot of graph-level statistics, computed once after construction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphStatistics {
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub mean_degree: f64,
    /// Transfers whose value column was missing or not a non-negative number
    pub unparsed_values: usize,
}

impl GraphStatistics {
    /// Statistics value for a graph without nodes
    pub fn empty() -> Self {
        Self {
            nodes: 0,
            edges: 0,
            density: 0.0,
            mean_degree: 0.0,
            unparsed_values: 0,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "Nodes: {}, Edges: {}, Density: {:.6}, Mean degree: {:.4}, Unparsed values: {}",
            self.nodes, self.edges, self.density, self.mean_degree, self.unparsed_values
        )
    }
}

/// Per-community summary for reporting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunitySummary {
    pub community: u32,
    pub size: usize,
    pub percentage_of_nodes: f64,
    pub colour: String,
    /// Lexically smallest member address
    pub representative: String,
}

/// Common timing information for a pipeline run
#[derive(Debug, Clone)]
pub struct TimingInfo {
    pub start_time: Instant,
    pub processing_duration: Duration,
}

impl Default for TimingInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingInfo {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            processing_duration: Duration::default(),
        }
    }

    pub fn finish(&mut self) {
        self.processing_duration = self.start_time.elapsed();
    }

    pub fn elapsed(&self) -> Duration {
        if self.processing_duration.is_zero() {
            self.start_time.elapsed()
        } else {
            self.processing_duration
        }
    }
}
