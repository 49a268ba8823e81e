//! Layout transformation: defaults, computed properties and type inference
//!
//! Walks an authored [`LayoutNode`] tree and produces resolved [`Control`]s:
//!
//! 1. field defaults fill the keys a node does not set itself (explicit
//!    layout values always win),
//! 2. computed properties are evaluated against the [`FormContext`],
//! 3. plain string fields backed by a long-text column become `textarea`,
//! 4. nested implicit lists become groups, and columns emit `controls`.

use serde_json::{Map, Value};
use tracing::debug;

use crate::form::{DefaultsMap, FormContext};
use crate::schema::ModelSchema;

use super::control::{ContainerKind, Control};
use super::error::LayoutError;
use super::node::{FieldRef, LayoutNode, Props, DEFAULT_FIELD_TYPE};

/// Multi-line text control type
pub const TEXTAREA: &str = "textarea";

/// Transforms one authored layout for one request
pub struct Transformer<'a> {
    defaults: &'a DefaultsMap,
    ctx: &'a FormContext<'a>,
    schema: &'a dyn ModelSchema,
}

impl<'a> Transformer<'a> {
    pub fn new(
        defaults: &'a DefaultsMap,
        ctx: &'a FormContext<'a>,
        schema: &'a dyn ModelSchema,
    ) -> Self {
        Self {
            defaults,
            ctx,
            schema,
        }
    }

    /// Transform the root of a layout
    ///
    /// A root list is returned as the control list itself, not wrapped in a
    /// group. Any other root node becomes a one-element list.
    pub fn transform_root(&self, node: &LayoutNode) -> Result<Vec<Control>, LayoutError> {
        match node {
            LayoutNode::List(items) => self.transform_all(items),
            other => Ok(vec![self.transform(other)?]),
        }
    }

    /// Transform a nested node; implicit lists become groups
    pub fn transform(&self, node: &LayoutNode) -> Result<Control, LayoutError> {
        match node {
            LayoutNode::Field(field) => self.transform_field(field),
            LayoutNode::Fieldset(fs) => {
                self.transform_container(ContainerKind::Fieldset, &fs.props, &fs.controls)
            }
            LayoutNode::Columns(cols) => {
                self.transform_container(ContainerKind::Columns, &cols.props, &cols.columns)
            }
            LayoutNode::Group(group) => {
                self.transform_container(ContainerKind::Group, &group.props, &group.controls)
            }
            LayoutNode::List(items) => Ok(Control::container(
                ContainerKind::Group,
                Map::new(),
                self.transform_all(items)?,
            )),
        }
    }

    fn transform_all(&self, items: &[LayoutNode]) -> Result<Vec<Control>, LayoutError> {
        items.iter().map(|item| self.transform(item)).collect()
    }

    fn transform_container(
        &self,
        kind: ContainerKind,
        props: &Props,
        children: &[LayoutNode],
    ) -> Result<Control, LayoutError> {
        let id = props
            .get("id")
            .and_then(|p| p.as_value())
            .and_then(Value::as_str);
        let props = self.evaluate(self.with_defaults(id, props));
        Ok(Control::container(kind, props, self.transform_all(children)?))
    }

    fn transform_field(&self, field: &FieldRef) -> Result<Control, LayoutError> {
        let mut props = Map::new();
        props.insert("id".to_string(), Value::String(field.id.clone()));
        let overrides = self.evaluate(self.with_defaults(Some(&field.id), &field.props));
        props.extend(overrides.into_iter().filter(|(key, _)| key != "id"));

        let field_type = match props.get("type") {
            None => DEFAULT_FIELD_TYPE,
            Some(Value::String(t)) => t.as_str(),
            Some(other) => {
                return Err(LayoutError::unsupported(
                    other,
                    format!("type of field '{}' must be a string", field.id),
                ))
            }
        };

        if ContainerKind::from_tag(field_type).is_some() {
            return Err(LayoutError::unsupported_node(
                format!("field '{}'", field.id),
                format!("a field cannot have container type '{}'", field_type),
            ));
        }

        if field_type == DEFAULT_FIELD_TYPE {
            match self.schema.storage_column(&field.id) {
                Some(column) if column.is_long_text() => {
                    debug!(field = %field.id, "long text column, using textarea");
                    props.insert("type".to_string(), Value::String(TEXTAREA.to_string()));
                }
                Some(_) => {}
                None => debug!(field = %field.id, "no storage column, keeping type"),
            }
        }

        Ok(Control::Field(props))
    }

    /// Copy `props` and add the configured defaults for `id` that it lacks
    fn with_defaults(&self, id: Option<&str>, props: &Props) -> Props {
        let mut merged = props.clone();
        if let Some(overrides) = id.and_then(|id| self.defaults.get(id)) {
            for (key, value) in overrides {
                if key != "id" && !merged.contains_key(key) {
                    merged.insert(key.clone(), value.clone());
                }
            }
        }
        merged
    }

    fn evaluate(&self, props: Props) -> Map<String, Value> {
        props
            .into_iter()
            .map(|(key, prop)| {
                let value = prop.evaluate(self.ctx);
                (key, value)
            })
            .collect()
    }
}
