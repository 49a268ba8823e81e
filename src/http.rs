//! Framework-neutral handling of the four form routes of a resource
//!
//! Every resource exposes:
//!
//! | route                     | endpoint                  | has instance |
//! |---------------------------|---------------------------|--------------|
//! | `<prefix>form/`           | [`FormEndpoint::List`]        | no  |
//! | `<prefix>form/<id>/`      | [`FormEndpoint::ListNamed`]   | no  |
//! | `<prefix><pk>/form/`      | [`FormEndpoint::Detail`]      | yes |
//! | `<prefix><pk>/form/<id>/` | [`FormEndpoint::DetailNamed`] | yes |

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, warn};

use crate::error::FormError;
use crate::form::{FormRequest, FormResource, ResolvedForm, ResourceRegistry};

/// One of the form routes of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEndpoint {
    List,
    ListNamed(String),
    Detail { pk: String },
    DetailNamed { pk: String, form_id: String },
}

impl FormEndpoint {
    /// Recognize the route of `path` below the resource mounted at `prefix`
    pub fn parse(prefix: &str, path: &str) -> Option<Self> {
        let rest = path.strip_prefix(prefix)?;
        let rest = rest.strip_suffix('/').unwrap_or(rest);

        if rest == "form" {
            return Some(FormEndpoint::List);
        }
        if let Some(name) = rest.strip_prefix("form/") {
            return (!name.is_empty()).then(|| FormEndpoint::ListNamed(name.to_string()));
        }

        let (pk, tail) = rest.split_once('/')?;
        if pk.is_empty() {
            return None;
        }
        if tail == "form" {
            return Some(FormEndpoint::Detail { pk: pk.to_string() });
        }
        let form_id = tail.strip_prefix("form/")?;
        (!form_id.is_empty()).then(|| FormEndpoint::DetailNamed {
            pk: pk.to_string(),
            form_id: form_id.to_string(),
        })
    }

    /// Whether the route addresses an existing record
    pub fn has_instance(&self) -> bool {
        matches!(self, FormEndpoint::Detail { .. } | FormEndpoint::DetailNamed { .. })
    }

    /// Requested form id, empty for the default form
    pub fn form_id(&self) -> &str {
        match self {
            FormEndpoint::ListNamed(name) => name,
            FormEndpoint::DetailNamed { form_id, .. } => form_id,
            FormEndpoint::List | FormEndpoint::Detail { .. } => "",
        }
    }

    /// Path segments between the resource path and the request path
    pub fn levels(&self) -> usize {
        match self {
            FormEndpoint::List | FormEndpoint::Detail { .. } => 1,
            FormEndpoint::ListNamed(_) | FormEndpoint::DetailNamed { .. } => 2,
        }
    }
}

/// Go up `levels` path segments, keeping a trailing `/`
pub fn base_path(path: &str, levels: usize) -> String {
    let mut path = path.strip_suffix('/').unwrap_or(path);
    for _ in 0..levels {
        path = match path.rfind('/') {
            Some(0) => "/",
            Some(idx) => &path[..idx],
            None => "",
        };
    }
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Status code and JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn ok(form: &ResolvedForm) -> Self {
        Self {
            status: 200,
            body: form.to_value(),
        }
    }

    pub fn error(err: &FormError) -> Self {
        Self {
            status: err.status_code(),
            body: json!({ "detail": err.to_string() }),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Resolve a request addressed to `resource`
pub fn handle(
    resource: &FormResource,
    registry: &ResourceRegistry,
    request: &FormRequest,
) -> Result<ResolvedForm, FormError> {
    let endpoint = FormEndpoint::parse(resource.url_prefix(), &request.path).ok_or_else(|| {
        FormError::NoRoute {
            path: request.path.clone(),
        }
    })?;
    debug!(resource = resource.name(), endpoint = ?endpoint, "form request");

    let base = base_path(&request.path, endpoint.levels());
    resource.form_metadata(
        registry,
        request,
        endpoint.has_instance(),
        endpoint.form_id(),
        &base,
    )
}

/// Route a request to its resource and turn the outcome into a response
pub fn dispatch(registry: &ResourceRegistry, request: &FormRequest) -> HttpResponse {
    let result = registry
        .route(&request.path)
        .ok_or_else(|| FormError::NoRoute {
            path: request.path.clone(),
        })
        .and_then(|resource| handle(resource, registry, request));

    match result {
        Ok(form) => HttpResponse::ok(&form),
        Err(err) if err.is_not_found() => {
            warn!(path = %request.path, "{}", err);
            HttpResponse::error(&err)
        }
        Err(err) => {
            error!(path = %request.path, "{}", err);
            HttpResponse::error(&err)
        }
    }
}
