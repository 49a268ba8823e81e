//! Authored layout tree
//!
//! A layout is written either in code, with the [`field`], [`fieldset`],
//! [`columns`] and [`group`] helpers, or as loose JSON/TOML data that is
//! parsed with [`LayoutNode::from_value`]. Property values may be computed per
//! request from the [`FormContext`].

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::form::FormContext;

use super::error::LayoutError;

/// Container tags understood by the transformer
pub const FIELDSET: &str = "fieldset";
pub const COLUMNS: &str = "columns";
pub const GROUP: &str = "group";

/// Leaf type assumed when a field carries no `type`
pub const DEFAULT_FIELD_TYPE: &str = "string";

/// Computes a property value for the current request
pub type ComputeFn = dyn Fn(&FormContext<'_>) -> Value + Send + Sync;

/// A property value of a layout node
#[derive(Clone)]
pub enum Prop {
    /// A literal value
    Value(Value),
    /// A value computed once per request
    Computed(Arc<ComputeFn>),
}

impl Prop {
    /// Create a literal property
    pub fn value(value: impl Into<Value>) -> Self {
        Prop::Value(value.into())
    }

    /// Create a computed property
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FormContext<'_>) -> Value + Send + Sync + 'static,
    {
        Prop::Computed(Arc::new(f))
    }

    /// The literal value, if this is not a computed property
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Prop::Value(v) => Some(v),
            Prop::Computed(_) => None,
        }
    }

    /// Resolve to a concrete value
    pub fn evaluate(&self, ctx: &FormContext<'_>) -> Value {
        match self {
            Prop::Value(v) => v.clone(),
            Prop::Computed(f) => f(ctx),
        }
    }
}

impl fmt::Debug for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Prop::Value(v) => write!(f, "{}", v),
            Prop::Computed(_) => write!(f, "<computed>"),
        }
    }
}

impl From<Value> for Prop {
    fn from(value: Value) -> Self {
        Prop::Value(value)
    }
}

impl From<&str> for Prop {
    fn from(value: &str) -> Self {
        Prop::Value(Value::String(value.to_string()))
    }
}

impl From<String> for Prop {
    fn from(value: String) -> Self {
        Prop::Value(Value::String(value))
    }
}

impl From<bool> for Prop {
    fn from(value: bool) -> Self {
        Prop::Value(Value::Bool(value))
    }
}

/// Ordered node properties
pub type Props = IndexMap<String, Prop>;

/// Convert a literal JSON mapping into properties
pub fn props_from_map(map: &Map<String, Value>) -> Props {
    map.iter()
        .map(|(k, v)| (k.clone(), Prop::Value(v.clone())))
        .collect()
}

/// Reference to a serializer field, with inline overrides
#[derive(Debug, Clone)]
pub struct FieldRef {
    pub id: String,
    /// Overrides such as `type`, `label`, `help_text` (never `id`)
    pub props: Props,
}

impl FieldRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            props: Props::new(),
        }
    }

    /// Set a literal or computed override
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Prop>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Set an override computed per request
    pub fn computed<F>(self, key: impl Into<String>, f: F) -> Self
    where
        F: Fn(&FormContext<'_>) -> Value + Send + Sync + 'static,
    {
        self.with(key, Prop::computed(f))
    }
}

/// Titled group of controls
#[derive(Debug, Clone)]
pub struct Fieldset {
    /// Properties of the fieldset itself; the title is stored as `label`
    pub props: Props,
    pub controls: Vec<LayoutNode>,
}

/// Controls laid out side by side, one child per column
#[derive(Debug, Clone)]
pub struct Columns {
    pub props: Props,
    pub columns: Vec<LayoutNode>,
}

/// Plain vertical grouping
#[derive(Debug, Clone)]
pub struct Group {
    pub props: Props,
    pub controls: Vec<LayoutNode>,
}

/// A node of an authored layout
#[derive(Debug, Clone)]
pub enum LayoutNode {
    Field(FieldRef),
    Fieldset(Fieldset),
    Columns(Columns),
    Group(Group),
    /// Bare sequence: the field list at the root, a group anywhere else
    List(Vec<LayoutNode>),
}

impl LayoutNode {
    /// Parse a loosely typed layout value
    ///
    /// Strings are field ids, arrays are implicit lists and mappings are
    /// either containers (by their `type`) or fields (by their `id`).
    pub fn from_value(value: &Value) -> Result<Self, LayoutError> {
        match value {
            Value::String(id) => Ok(LayoutNode::Field(FieldRef::new(id.clone()))),
            Value::Array(items) => items
                .iter()
                .map(LayoutNode::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(LayoutNode::List),
            Value::Object(map) => Self::from_map(value, map),
            _ => Err(LayoutError::unsupported(
                value,
                "expected a field id, a list or a mapping",
            )),
        }
    }

    fn from_map(value: &Value, map: &Map<String, Value>) -> Result<Self, LayoutError> {
        let node_type = match map.get("type") {
            None => None,
            Some(Value::String(t)) => Some(t.as_str()),
            Some(_) => return Err(LayoutError::unsupported(value, "'type' must be a string")),
        };

        match node_type {
            Some(FIELDSET) => {
                let controls = parse_children(value, map, "controls")?;
                Ok(LayoutNode::Fieldset(Fieldset {
                    props: props_without(map, &["controls"]),
                    controls,
                }))
            }
            Some(COLUMNS) => {
                let columns = parse_children(value, map, "columns")?;
                Ok(LayoutNode::Columns(Columns {
                    props: props_without(map, &["columns"]),
                    columns,
                }))
            }
            Some(GROUP) => {
                let controls = parse_children(value, map, "controls")?;
                Ok(LayoutNode::Group(Group {
                    props: props_without(map, &["controls"]),
                    controls,
                }))
            }
            _ => match map.get("id") {
                Some(Value::String(id)) => Ok(LayoutNode::Field(FieldRef {
                    id: id.clone(),
                    props: props_without(map, &["id"]),
                })),
                Some(_) => Err(LayoutError::unsupported(value, "'id' must be a string")),
                None => Err(LayoutError::unsupported(
                    value,
                    "a field mapping needs an 'id'",
                )),
            },
        }
    }

    /// Short description used in error messages
    pub fn describe(&self) -> String {
        match self {
            LayoutNode::Field(f) => format!("field '{}'", f.id),
            LayoutNode::Fieldset(_) => FIELDSET.to_string(),
            LayoutNode::Columns(_) => COLUMNS.to_string(),
            LayoutNode::Group(_) => GROUP.to_string(),
            LayoutNode::List(items) => format!("list of {} nodes", items.len()),
        }
    }
}

fn parse_children(
    value: &Value,
    map: &Map<String, Value>,
    key: &str,
) -> Result<Vec<LayoutNode>, LayoutError> {
    match map.get(key) {
        Some(Value::Array(items)) => items.iter().map(LayoutNode::from_value).collect(),
        Some(_) => Err(LayoutError::unsupported(
            value,
            format!("'{}' must be a list", key),
        )),
        None => Err(LayoutError::unsupported(
            value,
            format!("missing '{}'", key),
        )),
    }
}

fn props_without(map: &Map<String, Value>, skip: &[&str]) -> Props {
    map.iter()
        .filter(|(k, _)| !skip.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), Prop::Value(v.clone())))
        .collect()
}

impl From<&str> for LayoutNode {
    fn from(id: &str) -> Self {
        LayoutNode::Field(FieldRef::new(id))
    }
}

impl From<FieldRef> for LayoutNode {
    fn from(field: FieldRef) -> Self {
        LayoutNode::Field(field)
    }
}

impl From<Vec<LayoutNode>> for LayoutNode {
    fn from(items: Vec<LayoutNode>) -> Self {
        LayoutNode::List(items)
    }
}

/// A field reference
pub fn field(id: impl Into<String>) -> FieldRef {
    FieldRef::new(id)
}

/// Several controls grouped under a title
pub fn fieldset(title: impl Into<String>, controls: Vec<LayoutNode>) -> LayoutNode {
    let mut props = Props::new();
    props.insert("type".to_string(), Prop::from(FIELDSET));
    props.insert("label".to_string(), Prop::from(title.into()));
    LayoutNode::Fieldset(Fieldset { props, controls })
}

/// Controls placed in columns of equal width
///
/// Use a nested list (or [`group`]) to put several controls in one column.
pub fn columns(columns: Vec<LayoutNode>) -> LayoutNode {
    let mut props = Props::new();
    props.insert("type".to_string(), Prop::from(COLUMNS));
    LayoutNode::Columns(Columns { props, columns })
}

/// Controls laid out vertically
pub fn group(controls: Vec<LayoutNode>) -> LayoutNode {
    let mut props = Props::new();
    props.insert("type".to_string(), Prop::from(GROUP));
    LayoutNode::Group(Group { props, controls })
}
