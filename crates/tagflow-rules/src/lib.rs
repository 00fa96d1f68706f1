#![deny(unsafe_code)]

//! Declarative rulesets for tagflow.
//!
//! A ruleset names semantic tags (keyword and kind rules for columns) and the
//! transformations that apply to tagged columns. Rulesets are read from YAML
//! or JSON and validated before any data is touched.

mod document;
pub mod error;
pub mod ruleset;

pub use crate::error::{Result, RulesetError};
pub use crate::ruleset::Ruleset;
