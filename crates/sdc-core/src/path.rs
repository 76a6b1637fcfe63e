//! # Field-Path Addressing
//!
//! Period-delimited paths (`name.first`) into a nested JSON record.
//!
//! - [`resolve`] walks one segment at a time and yields `None` as soon as a
//!   segment is absent or the current value is not a mapping (scalars,
//!   `null` and arrays are never indexed into).
//! - [`resolve_or_null`] is the form hashing code uses: the not-found
//!   sentinel becomes `null` and never reaches a serializer as anything else.
//! - [`assign`] writes through existing mappings and materializes the
//!   missing suffix as one freshly nested mapping. Assigning to the root
//!   path replaces the top-level mapping's entries in place.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::map::Entry;
use serde_json::{Map, Value};

use crate::error::PathError;

/// A parsed, period-delimited path. The empty string is the root path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    /// The root path, addressing the whole record.
    pub fn root() -> Self {
        Self {
            raw: String::new(),
            segments: Vec::new(),
        }
    }

    /// Parse a dotted path.
    ///
    /// # Errors
    ///
    /// `PathError::EmptySegment` for `"a..b"`, `".a"` or `"a."`.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let segments: Vec<String> = raw.split('.').map(str::to_owned).collect();
        if segments.iter().any(String::is_empty) {
            return Err(PathError::EmptySegment(raw.to_owned()));
        }
        Ok(Self {
            raw: raw.to_owned(),
            segments,
        })
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path segments in walk order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The top-level field this path lives under, if any.
    pub fn field(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    /// The dotted form.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::str::FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Resolve `path` inside `root`. The root path returns `root` itself.
pub fn resolve<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(root, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            _ => None,
        })
}

/// Resolve `path`, substituting `null` when it does not resolve.
pub fn resolve_or_null(root: &Value, path: &FieldPath) -> Value {
    resolve(root, path).cloned().unwrap_or(Value::Null)
}

/// Assign `value` at `path` inside `root`.
///
/// # Errors
///
/// - `PathError::RootNotAMapping` when replacing the root with a non-mapping.
/// - `PathError::NotAMapping` when an existing value on the way down is not
///   a mapping.
pub fn assign(root: &mut Value, path: &FieldPath, value: Value) -> Result<(), PathError> {
    let Some((last, parents)) = path.segments.split_last() else {
        let Value::Object(replacement) = value else {
            return Err(PathError::RootNotAMapping);
        };
        match root {
            Value::Object(map) => {
                map.clear();
                map.extend(replacement);
            }
            other => *other = Value::Object(replacement),
        }
        return Ok(());
    };

    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let Value::Object(map) = current else {
            return Err(not_a_mapping(path, segment));
        };
        match map.entry(segment.clone()) {
            Entry::Occupied(entry) => current = entry.into_mut(),
            Entry::Vacant(entry) => {
                entry.insert(nest(&path.segments[depth + 1..], value));
                return Ok(());
            }
        }
    }

    let Value::Object(map) = current else {
        return Err(not_a_mapping(path, last));
    };
    map.insert(last.clone(), value);
    Ok(())
}

/// Wrap `leaf` in one mapping level per segment, outermost first.
fn nest(segments: &[String], leaf: Value) -> Value {
    segments.iter().rev().fold(leaf, |inner, segment| {
        let mut map = Map::new();
        map.insert(segment.clone(), inner);
        Value::Object(map)
    })
}

fn not_a_mapping(path: &FieldPath, segment: &str) -> PathError {
    PathError::NotAMapping {
        path: path.raw.clone(),
        segment: segment.to_owned(),
    }
}
