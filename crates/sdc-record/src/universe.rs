//! # Field Universe
//!
//! The fixed, alphabetically sorted set of top-level fields a scheme
//! version knows about, each with its empty default value. A universe never
//! changes after construction; records share it through an `Arc`.
//!
//! ## Configuration
//!
//! Universes are declared in YAML (or JSON) documents:
//!
//! ```yaml
//! fields:
//!   - name: email
//!     default: ""
//!   - name: name
//!     default: { first: "", last: "" }
//!   - name: photo
//!     default: null
//! ```
//!
//! A field without a `default` key defaults to `null`. Declaration order
//! does not matter; fields are sorted by name.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::UniverseError;

/// One top-level field and its empty value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Top-level field name.
    pub name: String,
    /// Value a fresh record holds for this field.
    #[serde(default)]
    pub default: Value,
}

impl FieldSpec {
    /// Declare a field with its default value.
    pub fn new(name: impl Into<String>, default: Value) -> Self {
        Self {
            name: name.into(),
            default,
        }
    }
}

/// Configuration document describing a universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Declared fields, in any order.
    pub fields: Vec<FieldSpec>,
}

/// The fixed, sorted set of fields a record may carry.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldUniverse {
    fields: Vec<FieldSpec>,
}

impl FieldUniverse {
    /// Build a universe from field declarations.
    ///
    /// # Errors
    ///
    /// `Empty`, `InvalidFieldName` or `DuplicateField`.
    pub fn new(fields: impl IntoIterator<Item = FieldSpec>) -> Result<Self, UniverseError> {
        let mut fields: Vec<FieldSpec> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(UniverseError::Empty);
        }
        if let Some(bad) = fields
            .iter()
            .find(|f| f.name.is_empty() || f.name.contains('.'))
        {
            return Err(UniverseError::InvalidFieldName(bad.name.clone()));
        }
        fields.sort_by(|a, b| a.name.cmp(&b.name));
        if let Some(pair) = fields.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(UniverseError::DuplicateField(pair[0].name.clone()));
        }
        Ok(Self { fields })
    }

    /// The standard personal-data universe: `email`, `name`, `phone`, `photo`.
    ///
    /// Listed in sorted order; `index_of` relies on it.
    pub fn personal_data() -> Self {
        let fields = vec![
            FieldSpec::new("email", json!("")),
            FieldSpec::new("name", json!({"first": "", "last": ""})),
            FieldSpec::new("phone", json!("")),
            FieldSpec::new("photo", Value::Null),
        ];
        debug_assert!(fields.windows(2).all(|w| w[0].name < w[1].name));
        Self { fields }
    }

    /// Build a universe from a parsed configuration document.
    pub fn from_config(config: UniverseConfig) -> Result<Self, UniverseError> {
        Self::new(config.fields)
    }

    /// Parse a YAML configuration document.
    pub fn from_yaml(yaml: &str) -> Result<Self, UniverseError> {
        let config: UniverseConfig = serde_yaml::from_str(yaml)?;
        Self::from_config(config)
    }

    /// Parse a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, UniverseError> {
        let config: UniverseConfig = serde_json::from_str(json)?;
        Self::from_config(config)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed universe.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of `name` in sorted order.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields
            .binary_search_by(|f| f.name.as_str().cmp(name))
            .ok()
    }

    /// Whether `name` is a member.
    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Field name at `index`.
    ///
    /// # Panics
    ///
    /// If `index >= self.len()`.
    pub fn name(&self, index: usize) -> &str {
        &self.fields[index].name
    }

    /// Field names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Field declarations in sorted order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// A record mapping with every field set to its default.
    pub fn default_content(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect();
        Value::Object(map)
    }

    /// The configuration document equivalent to this universe.
    pub fn to_config(&self) -> UniverseConfig {
        UniverseConfig {
            fields: self.fields.clone(),
        }
    }
}
