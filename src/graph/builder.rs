//! Graph Builder
//!
//! Turns a flat list of transfer records into an undirected multigraph:
//! one node per distinct address, one edge per transfer. Parallel edges
//! between the same pair of addresses are kept, so the edge count always
//! equals the record count. Edge endpoints are stored in transfer
//! direction (source = sender) so outgoing volume can still be derived.

use crate::errors::{GraphError, GraphResult};
use crate::types::{GraphStatistics, TransferRecord, TransferValue};
use crate::utils::math::{mean_degree, undirected_density};
use bigdecimal::{BigDecimal, Zero};
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Edge payload: one token transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferEdge {
    pub value: TransferValue,
    pub transaction_hash: String,
    pub log_index: u64,
}

/// Borrowed view of a single edge
#[derive(Debug, Clone, Copy)]
pub struct EdgeView<'a> {
    pub index: usize,
    pub source: &'a str,
    pub target: &'a str,
    pub transfer: &'a TransferEdge,
}

/// Undirected transfer multigraph keyed by address
#[derive(Debug, Clone, Default)]
pub struct TransferGraph {
    graph: UnGraph<String, TransferEdge>,
    node_map: HashMap<String, NodeIndex>,
}

impl TransferGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_add_node(&mut self, address: &str) -> NodeIndex {
        if let Some(&index) = self.node_map.get(address) {
            return index;
        }
        let index = self.graph.add_node(address.to_string());
        self.node_map.insert(address.to_string(), index);
        index
    }

    /// Add one transfer as an edge, creating endpoint nodes as needed
    pub fn add_transfer(&mut self, record: &TransferRecord) -> EdgeIndex {
        let from = self.get_or_add_node(&record.from_address);
        let to = self.get_or_add_node(&record.to_address);
        self.graph.add_edge(
            from,
            to,
            TransferEdge {
                value: record.value.clone(),
                transaction_hash: record.transaction_hash.clone(),
                log_index: record.log_index,
            },
        )
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Addresses in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.graph.raw_nodes().iter().map(|node| node.weight.as_str())
    }

    /// Addresses sorted lexically
    pub fn sorted_nodes(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = self.nodes().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Edges in insertion (record) order
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> {
        self.graph.edge_references().map(move |edge| EdgeView {
            index: edge.id().index(),
            source: self.graph[edge.source()].as_str(),
            target: self.graph[edge.target()].as_str(),
            transfer: edge.weight(),
        })
    }

    /// Number of edge endpoints at a node; self-transfers count twice
    pub fn degree(&self, address: &str) -> usize {
        let Some(&index) = self.node_map.get(address) else {
            return 0;
        };
        self.graph
            .edges(index)
            .map(|edge| if edge.source() == edge.target() { 2 } else { 1 })
            .sum()
    }

    /// Sum of the parsed values of every transfer sent by each address
    ///
    /// Every node is present in the result; senders of nothing map to zero.
    /// Transfers without a parsed amount contribute nothing.
    pub fn outgoing_values(&self) -> HashMap<&str, BigDecimal> {
        let mut totals: HashMap<&str, BigDecimal> = self
            .nodes()
            .map(|address| (address, BigDecimal::zero()))
            .collect();

        for edge in self.edges() {
            if let Some(amount) = edge.transfer.value.amount() {
                if let Some(total) = totals.get_mut(edge.source) {
                    *total += amount;
                }
            }
        }

        totals
    }

    /// Number of transfers whose value is missing or unparseable
    pub fn unparsed_value_count(&self) -> usize {
        self.graph
            .raw_edges()
            .iter()
            .filter(|edge| !edge.weight.value.is_amount())
            .count()
    }

    /// Compute the statistics snapshot for the current graph
    pub fn statistics(&self) -> GraphStatistics {
        let nodes = self.node_count();
        if nodes == 0 {
            return GraphStatistics::empty();
        }
        let edges = self.edge_count();

        GraphStatistics {
            nodes,
            edges,
            density: undirected_density(nodes, edges),
            mean_degree: mean_degree(2 * edges, nodes),
            unparsed_values: self.unparsed_value_count(),
        }
    }
}

/// Build the transfer graph and its statistics from fetched records
pub fn build_graph(records: &[TransferRecord]) -> GraphResult<(TransferGraph, GraphStatistics)> {
    if records.is_empty() {
        return Err(GraphError::EmptyInput);
    }

    let mut graph = TransferGraph::new();
    for record in records {
        match &record.value {
            TransferValue::Amount(_) => {}
            TransferValue::Missing => warn!(
                "Transfer {}:{} has no value; edge size will be 0",
                record.transaction_hash, record.log_index
            ),
            TransferValue::Invalid(raw) => warn!(
                "Transfer {}:{} has unparseable value '{}'; edge size will be 0",
                record.transaction_hash, record.log_index, raw
            ),
        }
        graph.add_transfer(record);
    }

    let statistics = graph.statistics();
    debug!("Graph statistics: {}", statistics.summary());
    info!(
        "Graph created: {} nodes, {} edges from {} records",
        statistics.nodes,
        statistics.edges,
        records.len()
    );

    Ok((graph, statistics))
}
