//! Per-resource form configuration

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::FormError;
use crate::layout::{LayoutError, LayoutNode, Prop, Props};
use crate::schema::FieldMetadata;

/// Field id -> overrides filled into that field's layout node
pub type DefaultsMap = IndexMap<String, Props>;

/// Builds a layout from the live field metadata
pub type LayoutFn = dyn Fn(&FieldMetadata) -> Result<LayoutNode, LayoutError> + Send + Sync;

/// Builds field defaults from the live field metadata
pub type DefaultsFn = dyn Fn(&FieldMetadata) -> DefaultsMap + Send + Sync;

/// Where a form's layout comes from
#[derive(Clone)]
pub enum LayoutSource {
    Static(LayoutNode),
    Computed(Arc<LayoutFn>),
}

impl LayoutSource {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FieldMetadata) -> Result<LayoutNode, LayoutError> + Send + Sync + 'static,
    {
        LayoutSource::Computed(Arc::new(f))
    }

    /// Produce the concrete layout tree
    pub fn resolve(&self, fields: &FieldMetadata) -> Result<LayoutNode, LayoutError> {
        match self {
            LayoutSource::Static(node) => Ok(node.clone()),
            LayoutSource::Computed(f) => f(fields),
        }
    }
}

impl fmt::Debug for LayoutSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutSource::Static(node) => f.debug_tuple("Static").field(node).finish(),
            LayoutSource::Computed(_) => write!(f, "Computed(<fn>)"),
        }
    }
}

/// Where a form's field defaults come from
#[derive(Clone)]
pub enum DefaultsSource {
    Static(DefaultsMap),
    Computed(Arc<DefaultsFn>),
}

impl DefaultsSource {
    pub fn computed<F>(f: F) -> Self
    where
        F: Fn(&FieldMetadata) -> DefaultsMap + Send + Sync + 'static,
    {
        DefaultsSource::Computed(Arc::new(f))
    }

    /// Produce the concrete defaults map
    pub fn resolve(&self, fields: &FieldMetadata) -> DefaultsMap {
        match self {
            DefaultsSource::Static(map) => map.clone(),
            DefaultsSource::Computed(f) => f(fields),
        }
    }
}

impl fmt::Debug for DefaultsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultsSource::Static(map) => f.debug_tuple("Static").field(map).finish(),
            DefaultsSource::Computed(_) => write!(f, "Computed(<fn>)"),
        }
    }
}

/// Build a defaults map from `(field, key, value)` triples
pub fn defaults<I, K, F, V>(entries: I) -> DefaultsMap
where
    I: IntoIterator<Item = (F, K, V)>,
    F: Into<String>,
    K: Into<String>,
    V: Into<Prop>,
{
    let mut map = DefaultsMap::new();
    for (field, key, value) in entries {
        map.entry(field.into())
            .or_default()
            .insert(key.into(), value.into());
    }
    map
}

/// Build a defaults map from a `{field: {key: value}}` JSON mapping
pub fn defaults_from_value(value: &Value) -> Result<DefaultsMap, LayoutError> {
    let Value::Object(fields) = value else {
        return Err(LayoutError::unsupported(value, "defaults must be a mapping"));
    };
    fields
        .iter()
        .map(|(id, overrides)| match overrides {
            Value::Object(map) => Ok((id.clone(), crate::layout::props_from_map(map))),
            other => Err(LayoutError::unsupported(
                other,
                format!("defaults for '{}' must be a mapping", id),
            )),
        })
        .collect()
}

/// Title of a form
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FormTitle {
    /// Same title for create and edit
    Fixed(String),
    Variants { create: String, edit: String },
}

impl FormTitle {
    pub fn variants(create: impl Into<String>, edit: impl Into<String>) -> Self {
        FormTitle::Variants {
            create: create.into(),
            edit: edit.into(),
        }
    }

    /// The title for creating or editing a record
    pub fn pick(&self, has_instance: bool) -> &str {
        match self {
            FormTitle::Fixed(title) => title,
            FormTitle::Variants { edit, .. } if has_instance => edit,
            FormTitle::Variants { create, .. } => create,
        }
    }
}

/// Layout, title and defaults of one form
#[derive(Debug, Clone, Default)]
pub struct FormSpec {
    /// `None` generates the layout from the writable fields
    pub layout: Option<LayoutSource>,
    pub title: Option<FormTitle>,
    pub defaults: Option<DefaultsSource>,
}

impl FormSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed layout
    pub fn with_layout(mut self, layout: impl Into<LayoutNode>) -> Self {
        self.layout = Some(LayoutSource::Static(layout.into()));
        self
    }

    /// Set a layout computed from the field metadata
    pub fn with_computed_layout<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldMetadata) -> Result<LayoutNode, LayoutError> + Send + Sync + 'static,
    {
        self.layout = Some(LayoutSource::computed(f));
        self
    }

    pub fn with_title(mut self, title: FormTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Set fixed field defaults
    pub fn with_defaults(mut self, defaults: DefaultsMap) -> Self {
        self.defaults = Some(DefaultsSource::Static(defaults));
        self
    }

    /// Set field defaults computed from the field metadata
    pub fn with_computed_defaults<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldMetadata) -> DefaultsMap + Send + Sync + 'static,
    {
        self.defaults = Some(DefaultsSource::computed(f));
        self
    }
}

/// A form served by another resource
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkedForm {
    /// Registered name of the resource that defines the form
    pub resource: String,
    /// Form id on that resource, empty for its default form
    #[serde(default)]
    pub form_id: String,
    /// Query or body parameter carrying the related record's id
    #[serde(default)]
    pub link_param: Option<String>,
}

impl LinkedForm {
    pub fn new(resource: impl Into<String>, form_id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            form_id: form_id.into(),
            link_param: None,
        }
    }

    pub fn with_link_param(mut self, param: impl Into<String>) -> Self {
        self.link_param = Some(param.into());
        self
    }
}

/// All forms of one resource
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    /// Served when no form id is requested
    pub default_form: FormSpec,
    /// Forms by id; `None` or an empty table means named forms are not configured
    pub named_forms: Option<IndexMap<String, FormSpec>>,
    pub linked_forms: IndexMap<String, LinkedForm>,
}

impl FormConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_form(mut self, spec: FormSpec) -> Self {
        self.default_form = spec;
        self
    }

    /// Add a named form, creating the named form table if needed
    pub fn with_form(mut self, name: impl Into<String>, spec: FormSpec) -> Self {
        self.named_forms
            .get_or_insert_with(IndexMap::new)
            .insert(name.into(), spec);
        self
    }

    pub fn with_linked_form(mut self, name: impl Into<String>, link: LinkedForm) -> Self {
        self.linked_forms.insert(name.into(), link);
        self
    }

    /// The linked form registered under `form_id`
    pub fn linked_form(&self, form_id: &str) -> Option<&LinkedForm> {
        if form_id.is_empty() {
            return None;
        }
        self.linked_forms.get(form_id)
    }

    /// Select the form spec for `form_id`, empty meaning the default form
    pub fn form_spec(&self, form_id: &str) -> Result<&FormSpec, FormError> {
        if form_id.is_empty() {
            return Ok(&self.default_form);
        }
        let forms = self
            .named_forms
            .as_ref()
            .filter(|forms| !forms.is_empty())
            .ok_or(FormError::NotConfigured)?;
        forms
            .get(form_id)
            .ok_or_else(|| FormError::not_found(form_id, forms.keys().map(String::as_str)))
    }

    /// Configured title, falling back from the named form to the default form
    pub fn title(&self, form_id: &str, has_instance: bool) -> Option<&str> {
        let named = if form_id.is_empty() {
            None
        } else {
            self.named_forms
                .as_ref()
                .and_then(|forms| forms.get(form_id))
                .and_then(|spec| spec.title.as_ref())
        };
        named
            .or(self.default_form.title.as_ref())
            .map(|title| title.pick(has_instance))
    }
}
