//! Form routes and the memoized form id -> route lookup

use std::collections::{HashMap, VecDeque};

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;

/// Capacity of a resource's route cache
pub const ROUTE_CACHE_CAPACITY: usize = 16;

/// Relative submission routes by form id, fixed at registration time
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: IndexMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the route serving form `form_id`
    pub fn with_route(mut self, form_id: impl Into<String>, path: impl Into<String>) -> Self {
        self.routes.insert(form_id.into(), path.into());
        self
    }

    /// Relative route for `form_id`, always ending in `/`
    ///
    /// The default form (empty id) and unknown ids map to the empty route.
    pub fn lookup(&self, form_id: &str) -> String {
        if form_id.is_empty() {
            return String::new();
        }
        match self.routes.get(form_id) {
            Some(path) if path.ends_with('/') => path.clone(),
            Some(path) => format!("{}/", path),
            None => String::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl FromIterator<(String, String)> for RouteTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            routes: iter.into_iter().collect(),
        }
    }
}

/// Bounded least-recently-used cache of route lookups
pub struct RouteCache {
    capacity: usize,
    inner: Mutex<Inner>,
}

struct Inner {
    map: HashMap<String, String>,
    /// Keys from least to most recently used
    order: VecDeque<String>,
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(ROUTE_CACHE_CAPACITY)
    }
}

impl RouteCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Inner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Cached route for `form_id`, computing and storing it on a miss
    pub fn get_or_insert_with<F>(&self, form_id: &str, compute: F) -> String
    where
        F: FnOnce() -> String,
    {
        let mut inner = self.inner.lock();
        if let Some(route) = inner.map.get(form_id).cloned() {
            inner.touch(form_id);
            return route;
        }

        debug!(form = form_id, "route cache miss");
        let route = compute();
        inner.map.insert(form_id.to_string(), route.clone());
        inner.order.push_back(form_id.to_string());

        while inner.map.len() > self.capacity {
            match inner.order.pop_front() {
                Some(old) => {
                    inner.map.remove(&old);
                }
                None => break,
            }
        }
        route
    }

    pub fn contains(&self, form_id: &str) -> bool {
        self.inner.lock().map.contains_key(form_id)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for RouteCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

impl Inner {
    /// Mark `key` as most recently used
    fn touch(&mut self, key: &str) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(k) = self.order.remove(pos) {
                self.order.push_back(k);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_lookup() {
        let table = RouteTable::new()
            .with_route("simple", "form/simple")
            .with_route("detail", "form/detail/");
        assert_eq!(table.lookup(""), "");
        assert_eq!(table.lookup("simple"), "form/simple/");
        assert_eq!(table.lookup("detail"), "form/detail/");
        assert_eq!(table.lookup("missing"), "");
    }

    #[test]
    fn test_cache_memoizes() {
        let cache = RouteCache::default();
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            "form/a/".to_string()
        };
        assert_eq!(cache.get_or_insert_with("a", compute), "form/a/");
        assert_eq!(cache.get_or_insert_with("a", compute), "form/a/");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_cache_evicts_least_recently_used() {
        let cache = RouteCache::new(2);
        cache.get_or_insert_with("a", || "a/".into());
        cache.get_or_insert_with("b", || "b/".into());
        // touch a, so b is the oldest
        cache.get_or_insert_with("a", || unreachable!());
        cache.get_or_insert_with("c", || "c/".into());

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
        assert!(cache.contains("c"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_default_capacity_is_bounded() {
        let cache = RouteCache::default();
        for i in 0..40 {
            let id = format!("form{}", i);
            cache.get_or_insert_with(&id, || format!("{}/", id));
        }
        assert_eq!(cache.len(), ROUTE_CACHE_CAPACITY);
        assert!(cache.contains("form39"));
        assert!(!cache.contains("form0"));
    }
}
