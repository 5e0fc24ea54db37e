//! Integration Tests Module
//!
//! End-to-end runs of the pipeline against the offline CSV source.

pub mod pipeline_end_to_end;
