//! Resolved layout tree
//!
//! After transformation every property is a concrete JSON value and every
//! implicit list has become either the root list or a group.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::node::{COLUMNS, FIELDSET, GROUP};

/// Kind of a container control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Fieldset,
    Columns,
    Group,
}

impl ContainerKind {
    /// The `type` tag emitted for this container
    pub fn tag(&self) -> &'static str {
        match self {
            ContainerKind::Fieldset => FIELDSET,
            ContainerKind::Columns => COLUMNS,
            ContainerKind::Group => GROUP,
        }
    }

    /// Container kind for a `type` tag, if it is one
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            FIELDSET => Some(ContainerKind::Fieldset),
            COLUMNS => Some(ContainerKind::Columns),
            GROUP => Some(ContainerKind::Group),
            _ => None,
        }
    }
}

/// A resolved UI control descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// A field control; the map always carries the `id`
    Field(Map<String, Value>),
    Container {
        kind: ContainerKind,
        /// Properties of the container itself, including its `type`
        props: Map<String, Value>,
        controls: Vec<Control>,
    },
}

impl Control {
    /// Create a container, stamping its `type` tag
    pub fn container(kind: ContainerKind, mut props: Map<String, Value>, controls: Vec<Control>) -> Self {
        props.insert("type".to_string(), Value::String(kind.tag().to_string()));
        Control::Container {
            kind,
            props,
            controls,
        }
    }

    /// The control's id, if it has one
    pub fn id(&self) -> Option<&str> {
        let props = match self {
            Control::Field(props) => props,
            Control::Container { props, .. } => props,
        };
        props.get("id").and_then(Value::as_str)
    }

    /// The control's properties
    pub fn props(&self) -> &Map<String, Value> {
        match self {
            Control::Field(props) => props,
            Control::Container { props, .. } => props,
        }
    }

    /// Mutable access to the control's properties
    pub fn props_mut(&mut self) -> &mut Map<String, Value> {
        match self {
            Control::Field(props) => props,
            Control::Container { props, .. } => props,
        }
    }

    /// The `type` property, if set
    pub fn control_type(&self) -> Option<&str> {
        self.props().get("type").and_then(Value::as_str)
    }

    /// Child controls of a container, empty for fields
    pub fn children(&self) -> &[Control] {
        match self {
            Control::Field(_) => &[],
            Control::Container { controls, .. } => controls,
        }
    }

    /// Convert to the JSON shape consumed by the form renderer
    pub fn into_value(self) -> Value {
        match self {
            Control::Field(props) => Value::Object(props),
            Control::Container {
                mut props,
                controls,
                ..
            } => {
                props.insert(
                    "controls".to_string(),
                    Value::Array(controls.into_iter().map(Control::into_value).collect()),
                );
                Value::Object(props)
            }
        }
    }
}

impl Serialize for Control {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.clone().into_value().serialize(serializer)
    }
}
