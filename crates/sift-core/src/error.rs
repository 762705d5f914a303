//! Error types shared by the query model and the route table.

use thiserror::Error;

/// Failures while building or decoding a [`Query`](crate::Query).
#[derive(Debug, Error)]
pub enum QueryError {
    /// `build()` was called before a required field was supplied.
    #[error("query is missing required field `{0}`")]
    MissingField(&'static str),

    /// The wire representation could not be encoded or decoded.
    #[error("invalid query JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while resolving a route.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("Could not find plugin route '{0}'.")]
    PluginRouteNotFound(String),

    #[error("unknown route '{0}'")]
    UnknownRoute(String),

    /// The name points at a nested route group, not a path.
    #[error("route '{0}' is a route group and cannot be resolved to a path")]
    NotAPath(String),

    #[error("route '{route}' expects an argument at position {index}")]
    MissingArgument { route: String, index: usize },

    #[error("app path prefix already set, cannot change it to '{0}'")]
    PrefixAlreadySet(String),
}
