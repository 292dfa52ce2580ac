//! Parser configuration
//!
//! A [`ParserConfig`] is immutable during a parse and is shared unchanged
//! with every recursive group parse. The data part deserializes from JSON;
//! field callbacks are registered in code.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Default limit for nested parenthesized groups
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Validates or rewrites the value of a term on one field
pub type FieldCallback = Arc<dyn Fn(&str) -> anyhow::Result<String> + Send + Sync>;

/// Callbacks keyed by exact (resolved) field name
#[derive(Clone, Default)]
pub struct FieldCallbacks(HashMap<String, FieldCallback>);

impl FieldCallbacks {
    pub fn get(&self, field: &str) -> Option<&FieldCallback> {
        self.0.get(field)
    }

    pub fn insert(&mut self, field: String, callback: FieldCallback) {
        self.0.insert(field, callback);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for FieldCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.0.keys().collect();
        names.sort();
        f.debug_set().entries(names).finish()
    }
}

/// Options recognized by the parser
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Fields searched by a term without `field:`
    pub default_fields: Vec<String>,
    /// Path prefixes whose fields need a nested query
    pub nested_paths: Vec<String>,
    /// Source field (or dotted prefix) to target field
    pub field_mapping: BTreeMap<String, String>,
    /// Maximum group nesting depth
    pub max_depth: usize,
    #[serde(skip)]
    pub field_callbacks: FieldCallbacks,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            default_fields: Vec::new(),
            nested_paths: Vec::new(),
            field_mapping: BTreeMap::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            field_callbacks: FieldCallbacks::default(),
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the data options from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_default_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_nested_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nested_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_field_mapping<I, K, V>(mut self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.field_mapping = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Register a callback for one field; repeatable
    pub fn with_field_callback<F>(mut self, field: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        self.field_callbacks.insert(field.into(), Arc::new(callback));
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
