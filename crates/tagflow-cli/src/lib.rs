//! CLI library components for tagflow.

pub mod logging;
pub mod pipeline;
pub mod types;
