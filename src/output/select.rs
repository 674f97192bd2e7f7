//! Response projection

use crate::error::{Error, Result};
use crate::types::JsonValue;
use jsonpath_rust::JsonPath;
use std::fmt;

/// What part of a response is written out
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSelector {
    /// A top-level result member; arrays yield one value per element
    Member(String),
    /// The whole response object
    Whole,
    /// The value of a bound command parameter
    Parameter(String),
    /// A JSONPath expression over the response object
    JsonPath(String),
    /// A dotted path with optional `[i]` indexing
    Path(String),
}

impl OutputSelector {
    /// Parse a `--select` argument, falling back to `default_member`
    ///
    /// - `*` selects the whole response
    /// - `^Name` selects the bound parameter `Name`
    /// - `$...` is a JSONPath expression
    /// - anything else is a dotted path
    pub fn parse(raw: Option<&str>, default_member: &str) -> Result<Self> {
        let Some(raw) = raw.map(str::trim) else {
            return Ok(Self::Member(default_member.to_string()));
        };

        if raw.is_empty() {
            return Err(Error::invalid_parameter("select", "must not be empty"));
        }
        if raw == "*" {
            return Ok(Self::Whole);
        }
        if let Some(name) = raw.strip_prefix('^') {
            if name.is_empty() {
                return Err(Error::invalid_parameter("select", "missing parameter name after '^'"));
            }
            return Ok(Self::Parameter(name.to_string()));
        }
        if raw.starts_with('$') {
            // Fail on a bad expression before any request is sent
            compile_jsonpath(raw)?;
            return Ok(Self::JsonPath(raw.to_string()));
        }
        if raw.contains('.') || raw.contains('[') {
            return Ok(Self::Path(raw.to_string()));
        }
        Ok(Self::Member(raw.to_string()))
    }

    /// Whether the selection reads bound parameters rather than the response
    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }

    /// Project `response`, with `params` holding the bound command parameters
    ///
    /// Missing members and null values select nothing.
    pub fn select(&self, response: &JsonValue, params: &JsonValue) -> Result<Vec<JsonValue>> {
        let selected = match self {
            Self::Whole => return Ok(vec![response.clone()]),
            Self::Member(name) => response.get(name).cloned(),
            Self::Parameter(name) => params.get(name).cloned(),
            Self::Path(path) => extract_path(response, path),
            Self::JsonPath(path) => return find_jsonpath(response, path),
        };
        Ok(selected.map(flatten).unwrap_or_default())
    }
}

impl fmt::Display for OutputSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Member(name) | Self::Path(name) | Self::JsonPath(name) => f.write_str(name),
            Self::Whole => f.write_str("*"),
            Self::Parameter(name) => write!(f, "^{name}"),
        }
    }
}

fn flatten(value: JsonValue) -> Vec<JsonValue> {
    match value {
        JsonValue::Null => Vec::new(),
        JsonValue::Array(items) => items,
        other => vec![other],
    }
}

fn compile_jsonpath(path: &str) -> Result<JsonPath> {
    JsonPath::try_from(path).map_err(|e| Error::json_path(format!("invalid JSONPath '{path}': {e}")))
}

fn find_jsonpath(value: &JsonValue, path: &str) -> Result<Vec<JsonValue>> {
    Ok(flatten(compile_jsonpath(path)?.find(value)))
}

/// Walk `a.b[0].c`; negative indices count from the end
fn extract_path(value: &JsonValue, path: &str) -> Option<JsonValue> {
    let mut current = value;
    for part in path.split('.') {
        let (name, indices) = match part.find('[') {
            Some(pos) => (&part[..pos], &part[pos..]),
            None => (part, ""),
        };

        if !name.is_empty() {
            current = current.get(name)?;
        }

        for index in indices.split(']').filter(|s| !s.is_empty()) {
            let index: i64 = index.strip_prefix('[')?.trim().parse().ok()?;
            let JsonValue::Array(items) = current else {
                return None;
            };
            let idx = if index < 0 {
                items.len().checked_sub(index.unsigned_abs() as usize)?
            } else {
                index as usize
            };
            current = items.get(idx)?;
        }
    }
    Some(current.clone())
}
