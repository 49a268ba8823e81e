//! Error types for layout resolution

use serde_json::Value;
use thiserror::Error;

/// Errors caused by a layout definition that cannot be turned into controls.
///
/// These point at a bug in the configured layout, not at a bad request.
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A layout node of a shape the transformer does not know
    #[error("layout {value} not supported: {reason}")]
    UnsupportedLayout { value: String, reason: String },

    /// A choice entry lacking a `value`, or both `label` and `display_name`
    #[error("choice {choice} of field '{field}' needs a 'value' and a 'label' or 'display_name'")]
    MalformedChoice { field: String, choice: String },

    /// The same field id used twice in one layout
    #[error("field '{id}' appears more than once in the layout")]
    DuplicateId { id: String },
}

impl LayoutError {
    /// Create an unsupported layout error for the offending raw value
    pub fn unsupported(value: &Value, reason: impl Into<String>) -> Self {
        Self::UnsupportedLayout {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported layout error for a node already parsed into the tree
    pub fn unsupported_node(description: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnsupportedLayout {
            value: description.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed choice error
    pub fn malformed_choice(field: impl Into<String>, choice: &Value) -> Self {
        Self::MalformedChoice {
            field: field.into(),
            choice: choice.to_string(),
        }
    }

    /// Create a duplicate id error
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }
}
