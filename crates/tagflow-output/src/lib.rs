//! Output stage of the pipeline.
//!
//! - **forward**: JSON envelopes and enriched payloads on disk
//! - **audit**: the append-only transformation audit log

pub mod audit;
pub mod common;
pub mod forward;

pub use audit::{
    AUDIT_LOG_HEADER, AuditLog, AuditRecord, format_applied_tags, format_applied_transformations,
};
pub use common::json_output_path;
pub use forward::{forward_payload, write_json};
