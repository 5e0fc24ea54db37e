//! Token Flow Analyser - Type System
//!
//! - `transfer`: raw and parsed token transfer records
//! - `render`: JSON export model (nodes + edges)
//! - `statistics`: graph statistics, community summaries and run timing

pub mod render;
pub mod statistics;
pub mod transfer;

pub use render::{RenderEdge, RenderModel, RenderNode};
pub use statistics::{CommunitySummary, GraphStatistics, TimingInfo};
pub use transfer::{
    normalise_address, validate_contract_address, TransferRecord, TransferRow, TransferValue,
    TRANSFER_COLUMNS,
};
