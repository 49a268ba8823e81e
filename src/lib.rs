//! Form Layouts - declarative form descriptions from serializer metadata
//!
//! This library turns the field metadata of a data model into a layout
//! description for a front-end form renderer. Layouts can be authored by
//! hand (field order, fieldsets, columns, computed properties and defaults)
//! or generated from the writable fields. Forms listed on one resource can
//! be served by another one through linked forms.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use form_layouts::form::{FormConfig, FormRequest, FormResource, ResourceRegistry};
//! use form_layouts::schema::{ColumnKind, FieldInfo, StaticSchema};
//!
//! let schema = StaticSchema::new("Invoice")
//!     .stored_field("number", FieldInfo::new("string").required(), ColumnKind::Char)
//!     .stored_field("note", FieldInfo::default(), ColumnKind::Text);
//!
//! let mut registry = ResourceRegistry::new();
//! registry
//!     .register(FormResource::new("invoices", FormConfig::new(), Arc::new(schema)))
//!     .unwrap();
//!
//! let response = form_layouts::dispatch(&registry, &FormRequest::new("/invoices/7/form/"));
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body["formTitle"], "Editing Invoice");
//! assert_eq!(response.body["layout"][1]["type"], "textarea");
//! ```

pub mod error;
pub mod form;
pub mod http;
pub mod layout;
pub mod manifest;
pub mod naming;
pub mod schema;

use std::path::Path;

pub use error::FormError;
pub use form::{FormConfig, FormRequest, FormResource, FormSpec, ResolvedForm, ResourceRegistry};
pub use http::{dispatch, FormEndpoint, HttpResponse};
pub use layout::{LayoutError, LayoutNode};
pub use manifest::{Manifest, ManifestError};

/// Load a manifest file and register its resources
pub fn load_registry(path: &Path) -> Result<ResourceRegistry, FormError> {
    Manifest::from_file(path)?.into_registry()
}

/// Register the resources of a manifest given as TOML source
///
/// # Example
///
/// ```rust
/// let registry = form_layouts::load_registry_str(r#"
///     [[resources]]
///     name = "cities"
///     display_name = "City"
///
///     [resources.fields.name]
///     storage = "char"
/// "#).unwrap();
///
/// assert!(registry.contains("cities"));
/// ```
pub fn load_registry_str(content: &str) -> Result<ResourceRegistry, FormError> {
    Manifest::from_str(content)?.into_registry()
}
