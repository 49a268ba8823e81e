//! TOML resource manifests
//!
//! A manifest declares form resources without code: their serializer fields,
//! storage columns, layouts, titles, defaults, routes and linked forms.
//!
//! ```toml
//! [[resources]]
//! name = "cities"
//! display_name = "City"
//! routes = { simple = "form/simple" }
//!
//! [resources.fields.name]
//! type = "string"
//! storage = "char"
//!
//! [resources.form]
//! layout = ["name"]
//! ```

use std::path::Path;
use std::sync::Arc;

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::error::FormError;
use crate::form::{
    defaults_from_value, FormConfig, FormResource, FormSpec, FormTitle, LinkedForm,
    ResourceRegistry, RouteTable,
};
use crate::layout::LayoutNode;
use crate::schema::{ColumnKind, FieldInfo, StaticSchema};

/// Errors that can occur when loading a manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("failed to read manifest file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("resource '{resource}': {reason}")]
    Invalid { resource: String, reason: String },
}

impl ManifestError {
    fn invalid(resource: &str, reason: impl Into<String>) -> Self {
        ManifestError::Invalid {
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }
}

/// A set of resource declarations
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub resources: Vec<ResourceManifest>,
}

/// One resource declaration
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceManifest {
    pub name: String,
    /// Record name used in generated titles; derived from `name` when absent
    #[serde(default)]
    pub display_name: Option<String>,
    /// Mount point, `/<name>/` when absent
    #[serde(default)]
    pub url_prefix: Option<String>,
    /// Form id -> relative submission route
    #[serde(default)]
    pub routes: IndexMap<String, String>,
    #[serde(default)]
    pub fields: IndexMap<String, FieldManifest>,
    /// The default form
    #[serde(default)]
    pub form: FormManifest,
    /// Named forms; an absent or empty table disables named forms
    #[serde(default)]
    pub forms: Option<IndexMap<String, FormManifest>>,
    #[serde(default)]
    pub linked_forms: IndexMap<String, LinkedForm>,
}

/// A serializer field plus its optional storage column
#[derive(Debug, Clone, Deserialize)]
pub struct FieldManifest {
    /// Storage column kind; absent for virtual fields
    #[serde(default)]
    pub storage: Option<ColumnKind>,
    #[serde(flatten)]
    pub info: FieldInfo,
}

/// Layout, title and defaults of one form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormManifest {
    #[serde(default)]
    pub layout: Option<Value>,
    #[serde(default)]
    pub title: Option<FormTitle>,
    #[serde(default)]
    pub defaults: Option<Value>,
}

impl Manifest {
    /// Load a manifest from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a manifest from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Build and register every declared resource
    pub fn into_registry(self) -> Result<ResourceRegistry, FormError> {
        self.validate_links()?;
        let mut registry = ResourceRegistry::new();
        for resource in self.resources {
            registry.register(resource.into_resource()?)?;
        }
        Ok(registry)
    }

    /// Linked forms must name a declared resource
    fn validate_links(&self) -> Result<(), ManifestError> {
        for resource in &self.resources {
            for (form, link) in &resource.linked_forms {
                if !self.resources.iter().any(|r| r.name == link.resource) {
                    return Err(ManifestError::invalid(
                        &resource.name,
                        format!(
                            "linked form '{}' targets undeclared resource '{}'",
                            form, link.resource
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ResourceManifest {
    /// Build the resource this declaration describes
    pub fn into_resource(self) -> Result<FormResource, ManifestError> {
        let display_name = self
            .display_name
            .clone()
            .unwrap_or_else(|| self.name.to_case(Case::Title));

        let mut schema = StaticSchema::new(display_name);
        for (id, field) in self.fields {
            schema = match field.storage {
                Some(kind) => schema.stored_field(id, field.info, kind),
                None => schema.field(id, field.info),
            };
        }

        let mut config =
            FormConfig::new().with_default_form(self.form.to_spec(&self.name)?);
        for (id, form) in self.forms.iter().flatten() {
            config = config.with_form(id.clone(), form.to_spec(&self.name)?);
        }
        for (id, link) in self.linked_forms {
            config = config.with_linked_form(id, link);
        }

        let routes: RouteTable = self.routes.into_iter().collect();
        let mut resource =
            FormResource::new(self.name, config, Arc::new(schema)).with_routes(routes);
        if let Some(prefix) = self.url_prefix {
            resource = resource.with_url_prefix(prefix);
        }
        Ok(resource)
    }
}

impl FormManifest {
    /// Parse the raw layout and defaults into a form spec
    pub fn to_spec(&self, resource: &str) -> Result<FormSpec, ManifestError> {
        let mut spec = FormSpec::new();
        if let Some(layout) = &self.layout {
            let node = LayoutNode::from_value(layout)
                .map_err(|err| ManifestError::invalid(resource, err.to_string()))?;
            spec = spec.with_layout(node);
        }
        if let Some(title) = &self.title {
            spec = spec.with_title(title.clone());
        }
        if let Some(defaults) = &self.defaults {
            let defaults = defaults_from_value(defaults)
                .map_err(|err| ManifestError::invalid(resource, err.to_string()))?;
            spec = spec.with_defaults(defaults);
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITIES: &str = r#"
[[resources]]
name = "cities"
display_name = "City"
routes = { simple = "form/simple" }

[resources.fields.name]
type = "string"
label = "Name"
required = true
storage = "char"

[resources.fields.notes]
storage = "text"
max_length = 2000

[resources.form]
title = { create = "New city", edit = "Edit city" }
layout = ["name", { type = "fieldset", label = "More", controls = ["notes"] }]
defaults = { name = { help_text = "Official name" } }

[resources.forms.simple]
layout = ["name"]
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_str(CITIES).unwrap();
        assert_eq!(manifest.resources.len(), 1);
        let cities = &manifest.resources[0];
        assert_eq!(cities.fields["name"].storage, Some(ColumnKind::Char));
        assert!(cities.fields["name"].info.required);
        assert_eq!(cities.fields["notes"].info.field_type, "string");
        assert_eq!(
            cities.fields["notes"].info.extra.get("max_length"),
            Some(&serde_json::json!(2000))
        );
        assert!(!cities.fields["notes"].info.extra.contains_key("storage"));
        assert_eq!(
            cities.form.title,
            Some(FormTitle::variants("New city", "Edit city"))
        );
    }

    #[test]
    fn test_into_resource() {
        let manifest = Manifest::from_str(CITIES).unwrap();
        let resource = manifest.resources[0].clone().into_resource().unwrap();
        assert_eq!(resource.name(), "cities");
        assert_eq!(resource.url_prefix(), "/cities/");
        assert_eq!(resource.routes().lookup("simple"), "form/simple/");
        assert!(resource.config().form_spec("simple").is_ok());
        assert!(matches!(
            resource.config().form_spec("other"),
            Err(FormError::NotFound { .. })
        ));
    }

    #[test]
    fn test_display_name_derived_from_name() {
        let manifest = Manifest::from_str("[[resources]]\nname = \"city_districts\"\n").unwrap();
        let resource = manifest.resources[0].clone().into_resource().unwrap();
        assert_eq!(resource.form_title("", false), "Creating a new City Districts");
        assert!(matches!(
            resource.config().form_spec("simple"),
            Err(FormError::NotConfigured)
        ));
    }

    #[test]
    fn test_empty_forms_table_is_not_configured() {
        let toml = "[[resources]]\nname = \"cities\"\n[resources.forms]\n";
        let manifest = Manifest::from_str(toml).unwrap();
        assert_eq!(manifest.resources[0].forms.as_ref().map(IndexMap::len), Some(0));
        let resource = manifest.resources[0].clone().into_resource().unwrap();
        assert!(matches!(
            resource.config().form_spec("simple"),
            Err(FormError::NotConfigured)
        ));
    }

    #[test]
    fn test_invalid_layout() {
        let toml = "[[resources]]\nname = \"x\"\n[resources.form]\nlayout = [1]\n";
        let err = Manifest::from_str(toml)
            .unwrap()
            .resources
            .remove(0)
            .into_resource()
            .unwrap_err();
        assert!(matches!(err, ManifestError::Invalid { ref resource, .. } if resource == "x"));
    }

    #[test]
    fn test_undeclared_link_target() {
        let toml = r#"
[[resources]]
name = "cities"

[resources.linked_forms.add_district]
resource = "districts"
"#;
        let err = Manifest::from_str(toml).unwrap().into_registry().unwrap_err();
        assert!(matches!(err, FormError::Manifest(ManifestError::Invalid { .. })));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            Manifest::from_str("[[resources]]\nname = "),
            Err(ManifestError::Parse(_))
        ));
    }
}
