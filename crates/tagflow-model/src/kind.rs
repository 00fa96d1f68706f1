//! Column kinds inferred from sampled values.
//!
//! A [`ColumnKind`] is the primitive type of a column as seen by the tagger.
//! Rulesets refer to kinds by name (`data_types` in the tag definitions); the
//! accepted spellings include the Python/pandas names older rulesets use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Inferred primitive kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Signed or unsigned integers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// `true` / `false`.
    Boolean,
    /// Native temporal values (dates and datetimes).
    ///
    /// Dates stored as text are [`ColumnKind::String`].
    Date,
    /// Text and anything else.
    String,
}

impl ColumnKind {
    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Integer => "integer",
            ColumnKind::Float => "float",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Date => "date",
            ColumnKind::String => "string",
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKind {
    type Err = ModelError;

    /// Parse a kind name as written in a ruleset (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "int" | "integer" | "int8" | "int16" | "int32" | "int64" | "uint8" | "uint16"
            | "uint32" | "uint64" => Ok(ColumnKind::Integer),
            "float" | "float32" | "float64" | "double" | "number" => Ok(ColumnKind::Float),
            "bool" | "boolean" => Ok(ColumnKind::Boolean),
            "date" | "datetime" | "timestamp" => Ok(ColumnKind::Date),
            "str" | "string" | "text" | "object" => Ok(ColumnKind::String),
            _ => Err(ModelError::UnknownKind(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_python_and_canonical_names() {
        assert_eq!("int".parse::<ColumnKind>(), Ok(ColumnKind::Integer));
        assert_eq!("Float64".parse::<ColumnKind>(), Ok(ColumnKind::Float));
        assert_eq!("bool".parse::<ColumnKind>(), Ok(ColumnKind::Boolean));
        assert_eq!(" str ".parse::<ColumnKind>(), Ok(ColumnKind::String));
        assert_eq!("datetime".parse::<ColumnKind>(), Ok(ColumnKind::Date));
    }

    #[test]
    fn rejects_unknown_names() {
        assert_eq!(
            "complex".parse::<ColumnKind>(),
            Err(ModelError::UnknownKind("complex".to_string()))
        );
    }

    #[test]
    fn display_round_trips() {
        for kind in [
            ColumnKind::Integer,
            ColumnKind::Float,
            ColumnKind::Boolean,
            ColumnKind::Date,
            ColumnKind::String,
        ] {
            assert_eq!(kind.to_string().parse::<ColumnKind>(), Ok(kind));
        }
    }
}
