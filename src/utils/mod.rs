//! Shared utility functions

pub mod colour;
pub mod math;
pub mod time;
