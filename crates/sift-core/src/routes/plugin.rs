//! # Plugin Routes
//!
//! Plugins register paths such as `/system/pipelines/:pipelineId`. Each path
//! gets a lookup key built from its segments (`SYSTEM_PIPELINES_PIPELINEID`);
//! parameterised paths resolve through a generator taking one positional
//! argument per `:param` segment.
//!
//! Registration happens on a [`PluginRouteRegistry`] while the deployment is
//! being wired up. [`PluginRouteRegistry::freeze`] turns it into read-only
//! [`PluginRoutes`] before anything resolves a route.

use super::{qualify_urls, RouteEntry, RouteMap};
use crate::error::RouteError;

/// A path whose `:name` segments are filled positionally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    absolute: bool,
    segments: Vec<String>,
    params: Vec<usize>,
}

impl PathTemplate {
    pub fn parse(path: &str) -> Self {
        let segments: Vec<String> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let params = segments
            .iter()
            .enumerate()
            .filter(|(_, s)| s.starts_with(':'))
            .map(|(idx, _)| idx)
            .collect();
        Self {
            absolute: path.starts_with('/'),
            segments,
            params,
        }
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// The lookup key: markers stripped, segments joined with `_`, uppercased.
    pub fn key(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.replacen(':', "", 1))
            .collect::<Vec<_>>()
            .join("_")
            .to_uppercase()
    }

    /// The template with the original `:param` markers in place.
    pub fn path(&self) -> String {
        self.join(&self.segments)
    }

    /// Substitute `args` into the parameter segments, left to right.
    pub fn render(&self, args: &[&str]) -> Result<String, RouteError> {
        let mut segments = self.segments.clone();
        for (position, &segment_idx) in self.params.iter().enumerate() {
            let value = args.get(position).ok_or_else(|| RouteError::MissingArgument {
                route: self.path(),
                index: position,
            })?;
            segments[segment_idx] = (*value).to_string();
        }
        Ok(self.join(&segments))
    }

    fn join(&self, segments: &[String]) -> String {
        let joined = segments.join("/");
        if self.absolute {
            format!("/{joined}")
        } else {
            joined
        }
    }
}

/// Lookup key for a plugin-registered path.
pub fn plugin_route_key(path: &str) -> String {
    PathTemplate::parse(path).key()
}

/// Mutable collection of plugin paths, filled before route resolution starts.
#[derive(Debug, Clone, Default)]
pub struct PluginRouteRegistry {
    paths: Vec<String>,
}

impl PluginRouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, path: impl Into<String>) {
        self.paths.push(path.into());
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Build the read-only route set, qualified with `prefix`.
    ///
    /// A later registration with the same key replaces an earlier one.
    pub fn freeze(self, prefix: &str) -> PluginRoutes {
        let mut routes = RouteMap::new();
        for path in self.paths {
            let template = PathTemplate::parse(&path);
            let key = template.key();
            let entry = if template.param_count() > 0 {
                RouteEntry::generator(move |args| template.render(args))
            } else {
                RouteEntry::Literal(path)
            };
            routes.insert(key, entry);
        }
        PluginRoutes {
            routes: qualify_urls(routes, prefix),
        }
    }
}

impl<S: Into<String>> FromIterator<S> for PluginRouteRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Frozen plugin routes.
#[derive(Debug, Clone, Default)]
pub struct PluginRoutes {
    routes: RouteMap,
}

impl PluginRoutes {
    pub fn plugin_route(&self, key: &str) -> Result<&RouteEntry, RouteError> {
        self.get_plugin_route(key)
            .ok_or_else(|| RouteError::PluginRouteNotFound(key.to_string()))
    }

    /// Like [`plugin_route`](Self::plugin_route) but without the error.
    pub fn get_plugin_route(&self, key: &str) -> Option<&RouteEntry> {
        self.routes.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
