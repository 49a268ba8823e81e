//! Layout decoration: merge controls with serializer field metadata

use serde_json::{Map, Value};

use crate::schema::FieldMetadata;

use super::control::Control;
use super::error::LayoutError;

/// Extension point called on every control after it has been decorated
pub trait DecorationHook: Send + Sync {
    fn decorate_item(&self, _control: &mut Control) {}
}

/// Hook that leaves controls untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl DecorationHook for NoopHook {}

/// Decorate a list of transformed controls
pub fn decorate(
    controls: Vec<Control>,
    fields: &FieldMetadata,
    hook: &dyn DecorationHook,
) -> Result<Vec<Control>, LayoutError> {
    controls
        .into_iter()
        .map(|control| decorate_control(control, fields, hook))
        .collect()
}

fn decorate_control(
    control: Control,
    fields: &FieldMetadata,
    hook: &dyn DecorationHook,
) -> Result<Control, LayoutError> {
    let mut decorated = match control {
        Control::Container {
            kind,
            props,
            controls,
        } => Control::Container {
            kind,
            props,
            controls: decorate(controls, fields, hook)?,
        },
        Control::Field(props) => Control::Field(decorate_field(props, fields)?),
    };
    hook.decorate_item(&mut decorated);
    Ok(decorated)
}

fn decorate_field(
    layout: Map<String, Value>,
    fields: &FieldMetadata,
) -> Result<Map<String, Value>, LayoutError> {
    let id = layout
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let mut merged = Map::new();
    merged.insert("id".to_string(), Value::String(id.clone()));
    if let Some(info) = fields.get(&id) {
        merged.extend(info.to_properties());
    }
    // layout values win over metadata
    merged.extend(layout);

    if merged.get("type").and_then(Value::as_str) == Some("choice") {
        merged.insert("type".to_string(), Value::String("select".to_string()));
    }

    let choices = match merged.get("choices") {
        Some(Value::Array(choices)) if !choices.is_empty() => Some(normalize_choices(&id, choices)?),
        _ => None,
    };
    if let Some(choices) = choices {
        merged.insert("choices".to_string(), Value::Array(choices));
    }

    Ok(merged)
}

/// Reshape choice entries to `{label, value}`
fn normalize_choices(field: &str, choices: &[Value]) -> Result<Vec<Value>, LayoutError> {
    choices
        .iter()
        .map(|choice| {
            let label = ["label", "display_name"]
                .iter()
                .filter_map(|key| choice.get(*key))
                .find(|v| is_truthy(v))
                .ok_or_else(|| LayoutError::malformed_choice(field, choice))?;
            let value = choice
                .get("value")
                .ok_or_else(|| LayoutError::malformed_choice(field, choice))?;

            let mut entry = Map::new();
            entry.insert("label".to_string(), label.clone());
            entry.insert("value".to_string(), value.clone());
            Ok(Value::Object(entry))
        })
        .collect()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
