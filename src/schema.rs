//! Field metadata and storage schema collaborators
//!
//! The form pipeline never inspects a model directly. It asks a [`ModelSchema`]
//! for the serializer's field metadata, for the storage column behind a field
//! and for the model's display name. [`StaticSchema`] is an in-process
//! implementation, built in code or loaded from a manifest.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::FormError;

fn default_field_type() -> String {
    "string".to_string()
}

/// Presentation facts about one serializer field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Presentation type (`string`, `integer`, `boolean`, `choice`, ...)
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub read_only: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    /// Nullable flag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_null: Option<bool>,

    /// Raw choice entries, usually `{value, display_name}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Value>>,

    /// Any further hints (`max_length`, `min_value`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for FieldInfo {
    fn default() -> Self {
        Self::new(default_field_type())
    }
}

impl FieldInfo {
    /// Create field info of the given presentation type
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            required: false,
            read_only: false,
            label: None,
            help_text: None,
            allow_null: None,
            choices: None,
            extra: Map::new(),
        }
    }

    /// Mark the field read-only
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Mark the field required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the help text
    pub fn with_help_text(mut self, help_text: impl Into<String>) -> Self {
        self.help_text = Some(help_text.into());
        self
    }

    /// Set the raw choice list
    pub fn with_choices(mut self, choices: Vec<Value>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Set an additional presentation hint
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Flatten into a property map, in serializer key convention
    pub fn to_properties(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!(value = %other, "field info did not serialize to a mapping");
                Map::new()
            }
            Err(e) => {
                warn!(error = %e, "failed to serialize field info");
                Map::new()
            }
        }
    }
}

/// Ordered field metadata for one serializer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMetadata {
    fields: IndexMap<String, FieldInfo>,
}

impl FieldMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style
    pub fn with_field(mut self, id: impl Into<String>, info: FieldInfo) -> Self {
        self.insert(id, info);
        self
    }

    /// Add or replace a field, keeping its original position when replaced
    pub fn insert(&mut self, id: impl Into<String>, info: FieldInfo) {
        self.fields.insert(id.into(), info);
    }

    pub fn get(&self, id: &str) -> Option<&FieldInfo> {
        self.fields.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.fields.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldInfo)> {
        self.fields.iter()
    }

    /// Ids of the fields a user can edit, in declaration order
    pub fn writable_ids(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, info)| !info.read_only)
            .map(|(id, _)| id.as_str())
    }
}

impl FromIterator<(String, FieldInfo)> for FieldMetadata {
    fn from_iter<T: IntoIterator<Item = (String, FieldInfo)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Storage type of a model column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Char,
    /// Unbounded text, rendered as a multi-line control
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    ForeignKey,
    Other,
}

/// Descriptor of the storage column behind a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageColumn {
    pub kind: ColumnKind,
}

impl StorageColumn {
    pub fn new(kind: ColumnKind) -> Self {
        Self { kind }
    }

    /// Whether the column holds long text
    pub fn is_long_text(&self) -> bool {
        self.kind == ColumnKind::Text
    }
}

/// Schema introspection consumed by the form pipeline
pub trait ModelSchema: Send + Sync {
    /// Serializer field metadata, one entry per serializable field
    fn field_metadata(&self) -> Result<FieldMetadata, FormError>;

    /// The storage column behind `field_id`, `None` for virtual fields
    fn storage_column(&self, field_id: &str) -> Option<StorageColumn>;

    /// Human readable model name, e.g. "Invoice"
    fn display_name(&self) -> String;
}

/// A [`ModelSchema`] backed by fixed, in-memory descriptions
#[derive(Debug, Clone, Default)]
pub struct StaticSchema {
    display_name: String,
    fields: FieldMetadata,
    columns: IndexMap<String, StorageColumn>,
}

impl StaticSchema {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            fields: FieldMetadata::new(),
            columns: IndexMap::new(),
        }
    }

    /// Add a serializer field
    pub fn field(mut self, id: impl Into<String>, info: FieldInfo) -> Self {
        self.fields.insert(id, info);
        self
    }

    /// Add a storage column
    pub fn column(mut self, id: impl Into<String>, kind: ColumnKind) -> Self {
        self.columns.insert(id.into(), StorageColumn::new(kind));
        self
    }

    /// Add a serializer field together with its storage column
    pub fn stored_field(self, id: impl Into<String>, info: FieldInfo, kind: ColumnKind) -> Self {
        let id = id.into();
        self.field(id.clone(), info).column(id, kind)
    }
}

impl ModelSchema for StaticSchema {
    fn field_metadata(&self) -> Result<FieldMetadata, FormError> {
        Ok(self.fields.clone())
    }

    fn storage_column(&self, field_id: &str) -> Option<StorageColumn> {
        self.columns.get(field_id).copied()
    }

    fn display_name(&self) -> String {
        self.display_name.clone()
    }
}
