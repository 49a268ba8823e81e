//! Form metadata assembly for one resource

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::FormError;
use crate::layout::{decorate, resolve_layout, Control, DecorationHook, NoopHook};
use crate::naming::camelize;
use crate::schema::ModelSchema;

use super::config::FormConfig;
use super::context::FormContext;
use super::linked::{self, LinkChain};
use super::registry::ResourceRegistry;
use super::request::FormRequest;
use super::response::{Action, Method, ResolvedForm};
use super::routes::{RouteCache, RouteTable};

/// A resource that serves form metadata
///
/// Holds the form configuration, the schema collaborator and the route table
/// of one resource. Everything except the route cache is immutable after
/// construction, so a resource can be shared between request threads.
pub struct FormResource {
    name: String,
    url_prefix: String,
    config: FormConfig,
    schema: Arc<dyn ModelSchema>,
    routes: RouteTable,
    url_cache: RouteCache,
    hook: Arc<dyn DecorationHook>,
}

impl FormResource {
    pub fn new(name: impl Into<String>, config: FormConfig, schema: Arc<dyn ModelSchema>) -> Self {
        let name = name.into();
        let url_prefix = format!("/{}/", name.trim_matches('/'));
        Self {
            name,
            url_prefix,
            config,
            schema,
            routes: RouteTable::new(),
            url_cache: RouteCache::default(),
            hook: Arc::new(NoopHook),
        }
    }

    pub fn with_routes(mut self, routes: RouteTable) -> Self {
        self.routes = routes;
        self
    }

    /// Mount the resource somewhere other than `/<name>/`
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.url_prefix = format!("/{}/", prefix.trim_matches('/'));
        self
    }

    pub fn with_decoration_hook(mut self, hook: Arc<dyn DecorationHook>) -> Self {
        self.hook = hook;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Resolve the form metadata for `form_id` (empty for the default form)
    ///
    /// `registry` supplies the targets of linked forms, `base_path` is the
    /// resource path the submission route is appended to.
    pub fn form_metadata(
        &self,
        registry: &ResourceRegistry,
        request: &FormRequest,
        has_instance: bool,
        form_id: &str,
        base_path: &str,
    ) -> Result<ResolvedForm, FormError> {
        self.assemble(
            registry,
            request,
            has_instance,
            form_id,
            base_path,
            &mut LinkChain::new(),
        )
    }

    pub(crate) fn assemble(
        &self,
        registry: &ResourceRegistry,
        request: &FormRequest,
        has_instance: bool,
        form_id: &str,
        base_path: &str,
        chain: &mut LinkChain,
    ) -> Result<ResolvedForm, FormError> {
        if let Some(link) = self.config.linked_form(form_id) {
            return linked::delegate(self, form_id, link, registry, request, chain);
        }

        // fail before introspecting the schema
        self.config.form_spec(form_id)?;

        let fields = self.schema.field_metadata()?;
        let ctx = FormContext::new(form_id, has_instance, request, &fields);

        let controls = resolve_layout(&self.config, &ctx, self.schema.as_ref())?;
        let controls = decorate(controls, &fields, self.hook.as_ref())?;
        let layout = controls
            .into_iter()
            .map(|control| camelize(Control::into_value(control)))
            .collect();

        debug!(resource = %self.name, form = form_id, has_instance, "assembled form");

        Ok(ResolvedForm {
            layout,
            form_title: self.form_title(form_id, has_instance),
            actions: Action::defaults(has_instance),
            method: Method::for_instance(has_instance),
            has_initial_data: has_instance,
            django_url: self.submission_url(base_path, form_id),
        })
    }

    /// Configured title, else one derived from the record's display name
    pub fn form_title(&self, form_id: &str, has_instance: bool) -> String {
        match self.config.title(form_id, has_instance) {
            Some(title) => title.to_string(),
            None if has_instance => format!("Editing {}", self.schema.display_name()),
            None => format!("Creating a new {}", self.schema.display_name()),
        }
    }

    /// `base_path` followed by the route serving `form_id`
    pub fn submission_url(&self, base_path: &str, form_id: &str) -> String {
        let route = self
            .url_cache
            .get_or_insert_with(form_id, || self.routes.lookup(form_id));
        format!("{}{}", base_path, route)
    }
}

impl fmt::Debug for FormResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormResource")
            .field("name", &self.name)
            .field("url_prefix", &self.url_prefix)
            .field("config", &self.config)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}
