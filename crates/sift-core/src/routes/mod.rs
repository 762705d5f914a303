//! # Route Table
//!
//! Static mapping from logical route names to literal paths, path generators
//! or nested groups. The table is qualified with the deployment's base path
//! once at startup (see [`qualify_urls`]) and is read-only afterwards.

pub mod plugin;
pub mod qualify;
pub mod search;
pub mod table;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RouteError;

pub use plugin::{plugin_route_key, PathTemplate, PluginRouteRegistry, PluginRoutes};
pub use qualify::{
    app_path_prefix, is_default_prefix, prefix_url, prefix_url_with, prefix_url_without_hostname,
    qualify_urls, set_app_path_prefix,
};
pub use search::RoutesTimeRange;

/// A path generator. Takes positional arguments, returns a path that may
/// carry a query string.
pub type RouteFn = Arc<dyn Fn(&[&str]) -> Result<String, RouteError> + Send + Sync>;

#[derive(Clone)]
pub enum RouteEntry {
    Literal(String),
    Generator(RouteFn),
    Nested(RouteMap),
}

impl RouteEntry {
    pub fn literal(path: impl Into<String>) -> Self {
        Self::Literal(path.into())
    }

    pub fn generator<F>(f: F) -> Self
    where
        F: Fn(&[&str]) -> Result<String, RouteError> + Send + Sync + 'static,
    {
        Self::Generator(Arc::new(f))
    }

    /// A generator substituting positional arguments into `:param` segments.
    pub fn template(path: &str) -> Self {
        let template = PathTemplate::parse(path);
        Self::generator(move |args| template.render(args))
    }

    pub fn nested<K: Into<String>>(entries: impl IntoIterator<Item = (K, RouteEntry)>) -> Self {
        Self::Nested(entries.into_iter().collect())
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(path) => Some(path),
            _ => None,
        }
    }

    /// Produce the URL for this entry. Literals ignore `args`.
    pub fn resolve(&self, args: &[&str]) -> Result<String, RouteError> {
        match self {
            Self::Literal(path) => Ok(path.clone()),
            Self::Generator(f) => f(args),
            Self::Nested(_) => Err(RouteError::NotAPath(String::new())),
        }
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(path) => f.debug_tuple("Literal").field(path).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
            Self::Nested(map) => f.debug_tuple("Nested").field(map).finish(),
        }
    }
}

#[derive(Clone, Default, Debug)]
pub struct RouteMap {
    entries: BTreeMap<String, RouteEntry>,
}

impl RouteMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: RouteEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&RouteEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RouteEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Find an entry by dotted path, e.g. `SYSTEM.CLUSTER.NODE_SHOW`.
    pub fn lookup(&self, dotted: &str) -> Result<&RouteEntry, RouteError> {
        let mut parts = dotted.split('.');
        let first = parts.next().unwrap_or_default();
        let mut entry = self
            .get(first)
            .ok_or_else(|| RouteError::UnknownRoute(dotted.to_string()))?;
        for part in parts {
            entry = match entry {
                RouteEntry::Nested(map) => map
                    .get(part)
                    .ok_or_else(|| RouteError::UnknownRoute(dotted.to_string()))?,
                _ => return Err(RouteError::UnknownRoute(dotted.to_string())),
            };
        }
        Ok(entry)
    }

    /// Resolve a dotted route name to a URL.
    pub fn resolve(&self, dotted: &str, args: &[&str]) -> Result<String, RouteError> {
        match self.lookup(dotted)? {
            RouteEntry::Nested(_) => Err(RouteError::NotAPath(dotted.to_string())),
            entry => entry.resolve(args),
        }
    }

    /// Every non-group entry, keyed by its dotted path.
    pub fn flatten(&self) -> Vec<(String, &RouteEntry)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);
        out
    }

    fn flatten_into<'a>(&'a self, parent: &str, out: &mut Vec<(String, &'a RouteEntry)>) {
        for (name, entry) in &self.entries {
            let path = if parent.is_empty() {
                name.clone()
            } else {
                format!("{parent}.{name}")
            };
            match entry {
                RouteEntry::Nested(map) => map.flatten_into(&path, out),
                _ => out.push((path, entry)),
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, RouteEntry)> for RouteMap {
    fn from_iter<I: IntoIterator<Item = (K, RouteEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl IntoIterator for RouteMap {
    type Item = (String, RouteEntry);
    type IntoIter = std::collections::btree_map::IntoIter<String, RouteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// The application's routes: the static table qualified with the base path,
/// the unqualified original and the frozen plugin routes.
pub struct Routes {
    prefix: String,
    qualified: RouteMap,
    unqualified: RouteMap,
    plugins: PluginRoutes,
}

impl Routes {
    pub fn new(prefix: &str, plugins: PluginRouteRegistry) -> Self {
        let unqualified = table::default_routes();
        Self {
            prefix: prefix.to_string(),
            qualified: qualify_urls(unqualified.clone(), prefix),
            unqualified,
            plugins: plugins.freeze(prefix),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn qualified(&self) -> &RouteMap {
        &self.qualified
    }

    pub fn unqualified(&self) -> &RouteMap {
        &self.unqualified
    }

    pub fn plugins(&self) -> &PluginRoutes {
        &self.plugins
    }

    pub fn resolve(&self, name: &str, args: &[&str]) -> Result<String, RouteError> {
        self.qualified.resolve(name, args)
    }

    pub fn plugin_route(&self, key: &str) -> Result<&RouteEntry, RouteError> {
        self.plugins.plugin_route(key)
    }

    pub fn get_plugin_route(&self, key: &str) -> Option<&RouteEntry> {
        self.plugins.get_plugin_route(key)
    }

    pub fn search_with_query(
        &self,
        query: &str,
        timerange: Option<&RoutesTimeRange>,
        streams: Option<&[String]>,
        stream_categories: Option<&[String]>,
    ) -> String {
        let url = search::search_with_query(query, timerange, streams, stream_categories);
        prefix_url_with(&url, &self.prefix)
    }

    pub fn search(
        &self,
        query: &str,
        timerange: Option<&RoutesTimeRange>,
        resolution: Option<&str>,
    ) -> String {
        prefix_url_with(&search::search(query, timerange, resolution), &self.prefix)
    }

    pub fn stream_search(
        &self,
        stream_id: &str,
        query: Option<&str>,
        timerange: Option<&RoutesTimeRange>,
        resolution: Option<&str>,
    ) -> String {
        let url = search::stream_search(stream_id, query, timerange, resolution);
        prefix_url_with(&url, &self.prefix)
    }
}
