//! Registry of form resources

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::FormError;

use super::assembler::FormResource;

/// All resources that serve forms, by name
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    resources: IndexMap<String, Arc<FormResource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource under its name
    pub fn register(&mut self, resource: FormResource) -> Result<Arc<FormResource>, FormError> {
        let name = resource.name().to_string();
        if self.resources.contains_key(&name) {
            return Err(FormError::DuplicateResource { name });
        }
        debug!(resource = %name, prefix = resource.url_prefix(), "registered resource");
        let resource = Arc::new(resource);
        self.resources.insert(name, Arc::clone(&resource));
        Ok(resource)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<FormResource>> {
        self.resources.get(name)
    }

    /// Look a resource up, suggesting close names when it is missing
    pub fn resolve(&self, name: &str) -> Result<&FormResource, FormError> {
        self.resources
            .get(name)
            .map(Arc::as_ref)
            .ok_or_else(|| FormError::unknown_resource(name, self.names()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Resource names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// The resource whose URL prefix is the longest prefix of `path`
    pub fn route(&self, path: &str) -> Option<&Arc<FormResource>> {
        self.resources
            .values()
            .filter(|res| path.starts_with(res.url_prefix()))
            .max_by_key(|res| res.url_prefix().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormConfig;
    use crate::schema::StaticSchema;

    fn resource(name: &str) -> FormResource {
        FormResource::new(name, FormConfig::new(), Arc::new(StaticSchema::new(name)))
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = ResourceRegistry::new();
        registry.register(resource("cities")).unwrap();
        assert!(registry.contains("cities"));
        assert_eq!(registry.resolve("cities").unwrap().name(), "cities");
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ResourceRegistry::new();
        registry.register(resource("cities")).unwrap();
        let result = registry.register(resource("cities"));
        assert!(matches!(result, Err(FormError::DuplicateResource { .. })));
    }

    #[test]
    fn test_unknown_resource_suggests() {
        let mut registry = ResourceRegistry::new();
        registry.register(resource("cities")).unwrap();
        let err = registry.resolve("citys").unwrap_err();
        assert_eq!(err.suggestions(), Some(&["cities".to_string()][..]));
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_route_picks_longest_prefix() {
        let mut registry = ResourceRegistry::new();
        registry.register(resource("cities")).unwrap();
        registry
            .register(resource("city-districts").with_url_prefix("cities/districts"))
            .unwrap();

        let hit = registry.route("/cities/districts/form/").unwrap();
        assert_eq!(hit.name(), "city-districts");
        assert_eq!(registry.route("/cities/5/form/").unwrap().name(), "cities");
        assert!(registry.route("/towns/form/").is_none());
    }
}
