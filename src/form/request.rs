//! The parts of an HTTP request the form pipeline looks at

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// A form metadata request, independent of any web framework
#[derive(Debug, Clone, Default)]
pub struct FormRequest {
    /// Request path, e.g. `/cities/5/form/simple/`
    pub path: String,
    /// Decoded query string parameters
    pub query: IndexMap<String, String>,
    /// Parsed request body, when it was a mapping
    pub body: Map<String, Value>,
}

impl FormRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: IndexMap::new(),
            body: Map::new(),
        }
    }

    /// Add a query parameter
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Add a body parameter
    pub fn with_body(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Look a parameter up in the query string, then in the body.
    ///
    /// Empty strings and nulls count as absent.
    pub fn param(&self, name: &str) -> Option<String> {
        if let Some(value) = self.query.get(name).filter(|v| !v.is_empty()) {
            return Some(value.clone());
        }
        match self.body.get(name)? {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
