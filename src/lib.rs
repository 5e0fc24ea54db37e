//! Token Transfer Graph Analyser
//!
//! Fetches the transfers of one token contract, builds the address graph,
//! detects communities and exports a PNG image plus a JSON render model.

pub mod cli;
pub mod config;
pub mod errors;
pub mod export;
pub mod fetch;
pub mod graph;
pub mod pipeline;
pub mod types;
pub mod utils;
