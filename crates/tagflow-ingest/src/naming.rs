//! Column name normalization and record flattening.

use polars::prelude::DataFrame;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::records::Record;

/// Convert a column name to snake_case.
///
/// Spaces and hyphens become underscores, a lowercase letter or digit
/// followed by an uppercase letter gets an underscore between them, and the
/// result is lowercased. `firstName` and `Last Name` become `first_name` and
/// `last_name`.
pub fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for ch in name.chars() {
        let ch = if ch == '-' || ch.is_whitespace() {
            '_'
        } else {
            ch
        };
        if ch.is_ascii_uppercase()
            && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
        {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
        prev = Some(ch);
    }
    out
}

/// Snake-case every key and flatten nested objects into `{parent}_{child}`.
///
/// Arrays are kept as JSON text. Flattened keys take the position of the
/// object they came from. Keys that collapse onto a name already taken
/// (`firstName` next to `first_name`) get a numeric suffix.
pub fn flatten_record(record: Record) -> Record {
    let mut out = Map::new();
    flatten_into(&mut out, None, record);
    out
}

fn flatten_into(out: &mut Record, prefix: Option<&str>, record: Record) {
    for (key, value) in record {
        let key = to_snake_case(&key);
        let key = match prefix {
            Some(prefix) => format!("{prefix}_{key}"),
            None => key,
        };
        match value {
            Value::Object(nested) => flatten_into(out, Some(&key), nested),
            Value::Array(_) => {
                let key = unique_name(key, |name| out.contains_key(name));
                out.insert(key, Value::String(value.to_string()));
            }
            other => {
                let key = unique_name(key, |name| out.contains_key(name));
                out.insert(key, other);
            }
        }
    }
}

/// Rename every column of `df` to snake_case.
///
/// Columns that snake-case to the same name keep their order; the later ones
/// get a numeric suffix.
pub fn snake_case_columns(df: &mut DataFrame) -> Result<()> {
    let mut renamed: Vec<String> = Vec::with_capacity(df.width());
    for name in df.get_column_names() {
        let name = unique_name(to_snake_case(name), |candidate| {
            renamed.iter().any(|taken| taken == candidate)
        });
        renamed.push(name);
    }
    df.set_column_names(renamed)?;
    Ok(())
}

/// Return `name`, or `{name}_2`, `{name}_3`, ... if `taken` already holds it.
fn unique_name(name: String, taken: impl Fn(&str) -> bool) -> String {
    if !taken(&name) {
        return name;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{name}_{n}");
        if !taken(&candidate) {
            warn!(column = %name, renamed = %candidate, "duplicate column name after snake_case");
            return candidate;
        }
        n += 1;
    }
}
