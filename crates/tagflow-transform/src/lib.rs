//! Tagging and transformation engine.
//!
//! - **inspect**: column kind inference from the first non-null value
//! - **tagger**: keyword and kind matching of semantic tags
//! - **transform**: date standardization, one-hot encoding, numeric normalization
//! - **assemble**: enriched payload construction
//! - **engine**: a full run over one table

pub mod assemble;
pub mod engine;
pub mod error;
pub mod inspect;
pub mod tagger;
pub mod transform;

pub use assemble::assemble_payload;
pub use engine::{Engine, EngineRun};
pub use error::{EngineError, Result};
pub use inspect::{inspect_kinds, inspect_kinds_with_samples};
pub use tagger::Tagger;
pub use transform::{
    AppliedParams, ColumnOutcome, ColumnReport, SkipReason, StepReport, TransformOutput,
    Transformer,
};
