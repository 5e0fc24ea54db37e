//! Unit Tests Module
//!
//! Component-level tests through the public API: graph properties,
//! community detection and the render model projection.

pub mod graph_properties;
pub mod partition_quality;
pub mod render_model;
