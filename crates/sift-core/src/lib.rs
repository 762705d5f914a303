//! # sift-core — The "Model" of SIFT
//!
//! Pure data shaping for the search front-end. Nothing in here talks to the
//! network or keeps mutable state beyond the one-time app path prefix.
//!
//! - [`query`] — the immutable [`Query`] value object and its builder.
//! - [`filter`] — the stream / stream-category [`FilterNode`] tree.
//! - [`routes`] — the static route table, base-path qualification and
//!   plugin route registry.
//! - [`search_bar`] — turning search-bar form values into a new query.

pub mod error;
pub mod filter;
pub mod id;
pub mod query;
pub mod routes;
pub mod search_bar;

pub use error::{QueryError, RouteError};
pub use filter::{
    category_filters_for_query, filters_for_query, filters_to_stream_category_set,
    filters_to_stream_set, new_filters_for_query, FilterNode,
};
pub use query::{
    create_elasticsearch_query_string, Query, QueryBuilder, QueryId, QueryString, RelativeRange,
    SearchFilter, SearchType, TimeRange,
};
pub use routes::{
    prefix_url, qualify_urls, PluginRouteRegistry, PluginRoutes, RouteEntry, RouteMap, Routes,
};
