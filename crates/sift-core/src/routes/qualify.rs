//! Base-path qualification for deployments mounted under a sub-path.

use std::sync::{Arc, OnceLock};

use super::{RouteEntry, RouteMap};
use crate::error::RouteError;

static APP_PATH_PREFIX: OnceLock<String> = OnceLock::new();

/// Record the deployment's base path. Called once at startup.
pub fn set_app_path_prefix(prefix: impl Into<String>) -> Result<(), RouteError> {
    APP_PATH_PREFIX.set(prefix.into()).map_err(RouteError::PrefixAlreadySet)
}

/// The configured base path, or `""` when none was set.
pub fn app_path_prefix() -> &'static str {
    APP_PATH_PREFIX.get().map(String::as_str).unwrap_or("")
}

/// An empty or root prefix leaves every route untouched.
pub fn is_default_prefix(prefix: &str) -> bool {
    prefix.is_empty() || prefix == "/"
}

/// Insert `prefix` in front of the directory part of `url`'s path and
/// normalise the result. Query string and fragment are carried over as-is.
pub fn prefix_url_without_hostname(url: &str, prefix: &str) -> String {
    let split = url.find(['?', '#']).unwrap_or(url.len());
    let (path, suffix) = url.split_at(split);

    let (directory, filename) = match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    };

    let mut qualified = normalize_path(&format!("{prefix}/{directory}/{filename}"));
    if path.starts_with('/') && !qualified.starts_with('/') {
        qualified.insert(0, '/');
    }
    qualified.push_str(suffix);
    qualified
}

/// Collapse duplicate slashes and resolve `.` and `..` segments.
fn normalize_path(path: &str) -> String {
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/') || path.ends_with("/.") || path.ends_with("/..");

    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut out = String::with_capacity(path.len());
    if absolute {
        out.push('/');
    }
    out.push_str(&segments.join("/"));
    if trailing && !segments.is_empty() {
        out.push('/');
    }
    out
}

/// Apply `prefix` to a single path, unless the prefix is the default.
pub fn prefix_url_with(route: &str, prefix: &str) -> String {
    if is_default_prefix(prefix) {
        route.to_string()
    } else {
        prefix_url_without_hostname(route, prefix)
    }
}

/// Apply the process-wide app path prefix to a single path.
pub fn prefix_url(route: &str) -> String {
    prefix_url_with(route, app_path_prefix())
}

/// Prefix every route in the table.
///
/// Literals are rewritten, generators are wrapped so their output is
/// rewritten on each call, nested groups recurse. With a default prefix the
/// table is returned as given.
pub fn qualify_urls(routes: RouteMap, prefix: &str) -> RouteMap {
    if is_default_prefix(prefix) {
        return routes;
    }

    routes
        .into_iter()
        .map(|(name, entry)| (name, qualify_entry(entry, prefix)))
        .collect()
}

fn qualify_entry(entry: RouteEntry, prefix: &str) -> RouteEntry {
    match entry {
        RouteEntry::Literal(path) => RouteEntry::Literal(prefix_url_without_hostname(&path, prefix)),
        RouteEntry::Generator(generate) => {
            let prefix = prefix.to_string();
            RouteEntry::Generator(Arc::new(move |args: &[&str]| {
                generate(args).map(|url| prefix_url_without_hostname(&url, &prefix))
            }))
        }
        RouteEntry::Nested(map) => RouteEntry::Nested(qualify_urls(map, prefix)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(path: &str) -> RouteMap {
        [("a", RouteEntry::literal(path))].into_iter().collect()
    }

    #[test]
    fn test_empty_prefix_returns_input_unchanged() {
        let routes = qualify_urls(single("/x"), "");
        assert_eq!(routes.get("a").and_then(RouteEntry::as_literal), Some("/x"));
        let routes = qualify_urls(single("/x"), "/");
        assert_eq!(routes.get("a").and_then(RouteEntry::as_literal), Some("/x"));
    }

    #[test]
    fn test_literal_is_prefixed() {
        let routes = qualify_urls(single("/x"), "/prefix");
        assert_eq!(routes.get("a").and_then(RouteEntry::as_literal), Some("/prefix/x"));
    }

    #[test]
    fn test_generators_and_nested_groups_are_prefixed() {
        let routes: RouteMap = [
            ("show", RouteEntry::template("/streams/:streamId/view")),
            (
                "GROUP",
                RouteEntry::nested([("LIST", RouteEntry::literal("/alerts/definitions"))]),
            ),
        ]
        .into_iter()
        .collect();

        let qualified = qualify_urls(routes, "/gl");
        assert_eq!(qualified.resolve("show", &["abc"]).unwrap(), "/gl/streams/abc/view");
        assert_eq!(
            qualified.resolve("GROUP.LIST", &[]).unwrap(),
            "/gl/alerts/definitions"
        );
    }

    #[test]
    fn test_prefix_keeps_query_and_fragment() {
        assert_eq!(
            prefix_url_without_hostname("/system/index_sets/1/configuration?from=list", "/gl"),
            "/gl/system/index_sets/1/configuration?from=list"
        );
        assert_eq!(
            prefix_url_without_hostname("/search?q=a/b#top", "/gl"),
            "/gl/search?q=a/b#top"
        );
    }

    #[test]
    fn test_prefix_normalises_path() {
        assert_eq!(prefix_url_without_hostname("/", "/gl"), "/gl/");
        assert_eq!(prefix_url_without_hostname("/alerts/", "/gl/"), "/gl/alerts/");
        assert_eq!(prefix_url_without_hostname("/a//b/./c", "/gl"), "/gl/a/b/c");
        assert_eq!(prefix_url_without_hostname("/a/../b", "/gl"), "/gl/b");
        assert_eq!(prefix_url_without_hostname("search", "/gl"), "/gl/search");
    }

    #[test]
    fn test_prefix_url_with_default_prefix() {
        assert_eq!(prefix_url_with("/search", ""), "/search");
        assert_eq!(prefix_url_with("/search", "/"), "/search");
        assert_eq!(prefix_url_with("/search", "/test"), "/test/search");
    }
}
