//! Transfer graph construction and analysis
//!
//! - **Builder** - One node per address, one edge per transfer, plus statistics
//! - **Partition** - Louvain modularity-based community detection
//! - **Layout** - Fruchterman-Reingold spring layout
//!
//! Both stochastic stages take an explicit seed so runs are reproducible.

pub mod builder;
pub mod layout;
pub mod partition;

pub use builder::{build_graph, EdgeView, TransferEdge, TransferGraph};
pub use layout::{spring_layout, Layout, LayoutConfig, Position};
pub use partition::{partition_graph, LouvainPartitioner, Partition, PartitionConfig};
