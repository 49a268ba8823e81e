//! Form metadata response sent to the form renderer

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

/// HTTP method the renderer submits the form with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Post,
    Patch,
}

impl Method {
    /// `patch` when editing an existing record, `post` otherwise
    pub fn for_instance(has_instance: bool) -> Self {
        if has_instance {
            Method::Patch
        } else {
            Method::Post
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Post => "post",
            Method::Patch => "patch",
        }
    }
}

/// A button shown under the form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub cancel: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Action {
    /// The submit button
    pub fn primary(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            color: Some("primary".to_string()),
            cancel: false,
        }
    }

    /// The button that dismisses the form
    pub fn cancel() -> Self {
        Self {
            id: "cancel".to_string(),
            label: "Cancel".to_string(),
            color: None,
            cancel: true,
        }
    }

    /// Save/Cancel when editing, Create/Cancel otherwise
    pub fn defaults(has_instance: bool) -> Vec<Action> {
        let submit = if has_instance {
            Action::primary("save", "Save")
        } else {
            Action::primary("create", "Create")
        };
        vec![submit, Action::cancel()]
    }
}

/// Fully resolved form description
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedForm {
    /// Decorated controls with camel-case keys
    pub layout: Vec<Value>,
    pub form_title: String,
    pub actions: Vec<Action>,
    pub method: Method,
    pub has_initial_data: bool,
    /// Where the form is submitted
    pub django_url: String,
}

impl ResolvedForm {
    /// JSON body of the response
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            warn!(error = %e, title = %self.form_title, "failed to serialize form response");
            Value::Null
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_method() {
        assert_eq!(Method::for_instance(true), Method::Patch);
        assert_eq!(Method::for_instance(false).as_str(), "post");
        assert_eq!(serde_json::to_value(Method::Patch).unwrap(), json!("patch"));
    }

    #[test]
    fn test_action_serialization_skips_unset_keys() {
        assert_eq!(
            serde_json::to_value(Action::defaults(false)).unwrap(),
            json!([
                {"id": "create", "label": "Create", "color": "primary"},
                {"id": "cancel", "label": "Cancel", "cancel": true},
            ])
        );
    }

    #[test]
    fn test_resolved_form_keys_are_camel_case() {
        let form = ResolvedForm {
            layout: vec![json!({"id": "name"})],
            form_title: "Editing City".to_string(),
            actions: Action::defaults(true),
            method: Method::Patch,
            has_initial_data: true,
            django_url: "/cities/5/".to_string(),
        };
        let value = form.to_value();
        let keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(
            keys,
            vec!["layout", "formTitle", "actions", "method", "hasInitialData", "djangoUrl"]
        );
        assert_eq!(value["actions"][0]["id"], json!("save"));
    }
}
