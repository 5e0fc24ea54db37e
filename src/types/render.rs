//! Render model types for the JSON export
//!
//! Field names and shapes are consumed by external interactive graph
//! viewers (sigma.js style `{nodes, edges}` documents); every field is
//! always present.

use serde::{Deserialize, Serialize};

/// Complete exportable graph document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderModel {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

/// One address in the rendered graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    /// Aggregate outgoing transfer value (raw token units)
    pub size: f64,
    /// `#RRGGBB`
    pub color: String,
}

/// One transfer in the rendered graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderEdge {
    pub id: String,
    pub label: String,
    pub source: String,
    pub target: String,
    pub color: String,
    /// Transfer value, 0 when missing or unparseable
    pub size: f64,
}

impl RenderModel {
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }
}
