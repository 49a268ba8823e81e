//! Linked forms: forms listed on one resource but served by another

use tracing::debug;

use crate::error::FormError;

use super::assembler::FormResource;
use super::config::LinkedForm;
use super::registry::ResourceRegistry;
use super::request::FormRequest;
use super::response::ResolvedForm;

/// `(resource, form)` pairs visited while following linked forms
#[derive(Debug, Default)]
pub(crate) struct LinkChain {
    visited: Vec<String>,
}

impl LinkChain {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record a hop, failing if it was already taken
    fn enter(&mut self, resource: &str, form: &str) -> Result<(), FormError> {
        let hop = format!("{}/{}", resource, form);
        if self.visited.contains(&hop) {
            let mut chain = self.visited.clone();
            chain.push(hop);
            return Err(FormError::CircularLink {
                chain: chain.join(" -> "),
            });
        }
        self.visited.push(hop);
        Ok(())
    }
}

/// Resolve linked form `form_name` of `host` through the resource it names
///
/// The delegate sees an instance when the request carries the link id, and
/// its submission URL is built from the request path with the `form` route
/// replaced by the linked form's name. Its result is returned unchanged.
pub(crate) fn delegate(
    host: &FormResource,
    form_name: &str,
    link: &LinkedForm,
    registry: &ResourceRegistry,
    request: &FormRequest,
    chain: &mut LinkChain,
) -> Result<ResolvedForm, FormError> {
    chain.enter(host.name(), form_name)?;

    let target = registry.resolve(&link.resource)?;
    let link_id = link
        .link_param
        .as_deref()
        .and_then(|param| request.param(param));
    let base_path = linked_base_path(&request.path, form_name);

    debug!(
        from = host.name(),
        to = target.name(),
        form = form_name,
        link_id = ?link_id,
        base_path = %base_path,
        "delegating linked form"
    );

    target.assemble(
        registry,
        request,
        link_id.is_some(),
        &link.form_id,
        &base_path,
        chain,
    )
}

/// Replace a trailing `/form` or `/form/<segment>` route by `/<form_name>/`
pub fn linked_base_path(path: &str, form_name: &str) -> String {
    format!("{}/{}/", strip_form_route(path), form_name)
}

fn strip_form_route(path: &str) -> &str {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    if let Some((head, segment)) = trimmed.rsplit_once('/') {
        if !segment.is_empty() {
            if let Some(stripped) = head.strip_suffix("/form") {
                return stripped;
            }
        }
    }
    trimmed.strip_suffix("/form").unwrap_or(trimmed)
}
