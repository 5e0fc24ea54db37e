//! Render Model Builder
//!
//! Projects graph + partition + layout into the exportable node/edge
//! document. Node size is the aggregate outgoing value of the address,
//! edge size the transfer value (0 when missing or unparseable).

use crate::errors::{GraphError, GraphResult};
use crate::graph::{Layout, Partition, TransferGraph};
use crate::types::{RenderEdge, RenderModel, RenderNode};
use crate::utils::colour::{community_colour, CROSS_COMMUNITY_EDGE_COLOUR};
use crate::utils::math::decimal_to_f64;
use tracing::debug;

/// Build the render model; every node must be partitioned and positioned
pub fn build_render_model(
    graph: &TransferGraph,
    partition: &Partition,
    layout: &Layout,
) -> GraphResult<RenderModel> {
    let outgoing = graph.outgoing_values();

    let mut nodes = Vec::with_capacity(graph.node_count());
    for address in graph.nodes() {
        let community = partition
            .get(address)
            .ok_or_else(|| GraphError::MissingPartition {
                node: address.to_string(),
            })?;
        let position = layout.get(address).ok_or_else(|| GraphError::MissingLayout {
            node: address.to_string(),
        })?;

        nodes.push(RenderNode {
            id: address.to_string(),
            label: address.to_string(),
            x: position.x,
            y: position.y,
            size: outgoing.get(address).map(decimal_to_f64).unwrap_or(0.0),
            color: community_colour(community),
        });
    }

    let mut edges = Vec::with_capacity(graph.edge_count());
    for edge in graph.edges() {
        // Endpoints were checked above
        let colour = match (partition.get(edge.source), partition.get(edge.target)) {
            (Some(a), Some(b)) if a == b => community_colour(a),
            _ => CROSS_COMMUNITY_EDGE_COLOUR.to_string(),
        };

        edges.push(RenderEdge {
            id: edge.index.to_string(),
            label: edge.transfer.transaction_hash.clone(),
            source: edge.source.to_string(),
            target: edge.target.to_string(),
            color: colour,
            size: edge.transfer.value.amount().map(decimal_to_f64).unwrap_or(0.0),
        });
    }

    debug!(
        "Render model: {} nodes, {} edges",
        nodes.len(),
        edges.len()
    );

    Ok(RenderModel { nodes, edges })
}
