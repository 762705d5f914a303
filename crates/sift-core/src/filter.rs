//! # Stream Filter Tree
//!
//! Translates search-bar selections (stream ids, stream category names) into
//! the nested boolean filter the backend expects, and back again.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A node of the filter tree attached to a [`Query`](crate::Query).
///
/// Wire shape: `{"type": "or", "filters": [...]}`, `{"type": "stream", "id": ..}`
/// or `{"type": "stream_category", "category": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterNode {
    Stream {
        id: String,
    },
    StreamCategory {
        category: String,
    },
    And {
        #[serde(default)]
        filters: Vec<FilterNode>,
    },
    Or {
        #[serde(default)]
        filters: Vec<FilterNode>,
    },
}

impl FilterNode {
    pub fn stream(id: impl Into<String>) -> Self {
        Self::Stream { id: id.into() }
    }

    pub fn stream_category(category: impl Into<String>) -> Self {
        Self::StreamCategory {
            category: category.into(),
        }
    }

    /// Children of a combinator node; leaves have none.
    pub fn children(&self) -> &[FilterNode] {
        match self {
            Self::And { filters } | Self::Or { filters } => filters,
            Self::Stream { .. } | Self::StreamCategory { .. } => &[],
        }
    }
}

fn stream_filters<S: AsRef<str>>(streams: &[S]) -> Vec<FilterNode> {
    streams.iter().map(|s| FilterNode::stream(s.as_ref())).collect()
}

fn stream_category_filters<S: AsRef<str>>(categories: &[S]) -> Vec<FilterNode> {
    categories
        .iter()
        .map(|c| FilterNode::stream_category(c.as_ref()))
        .collect()
}

/// `Or` over one `Stream` leaf per id, in input order. `None` for no streams.
pub fn filters_for_query<S: AsRef<str>>(streams: &[S]) -> Option<FilterNode> {
    if streams.is_empty() {
        return None;
    }
    Some(FilterNode::Or {
        filters: stream_filters(streams),
    })
}

/// `Or` over one `StreamCategory` leaf per category. `None` for no categories.
pub fn category_filters_for_query<S: AsRef<str>>(categories: &[S]) -> Option<FilterNode> {
    if categories.is_empty() {
        return None;
    }
    Some(FilterNode::Or {
        filters: stream_category_filters(categories),
    })
}

/// Combined filter for a stream and a category selection.
///
/// Stream leaves come first when both selections are present.
pub fn new_filters_for_query<S, C>(streams: &[S], categories: &[C]) -> Option<FilterNode>
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    if !streams.is_empty() && !categories.is_empty() {
        let mut filters = stream_filters(streams);
        filters.extend(stream_category_filters(categories));
        return Some(FilterNode::Or { filters });
    }

    filters_for_query(streams).or_else(|| category_filters_for_query(categories))
}

fn collect_leaves<'a>(
    filter: &'a FilterNode,
    pick: fn(&'a FilterNode) -> Option<&'a str>,
    out: &mut IndexSet<String>,
) {
    if let Some(value) = pick(filter) {
        out.insert(value.to_string());
        return;
    }
    for child in filter.children() {
        collect_leaves(child, pick, out);
    }
}

/// All stream ids referenced anywhere in the tree, in first-seen order.
pub fn filters_to_stream_set(filter: Option<&FilterNode>) -> IndexSet<String> {
    let mut streams = IndexSet::new();
    if let Some(filter) = filter {
        collect_leaves(
            filter,
            |node| match node {
                FilterNode::Stream { id } => Some(id.as_str()),
                _ => None,
            },
            &mut streams,
        );
    }
    streams
}

/// All stream categories referenced anywhere in the tree, in first-seen order.
pub fn filters_to_stream_category_set(filter: Option<&FilterNode>) -> IndexSet<String> {
    let mut categories = IndexSet::new();
    if let Some(filter) = filter {
        collect_leaves(
            filter,
            |node| match node {
                FilterNode::StreamCategory { category } => Some(category.as_str()),
                _ => None,
            },
            &mut categories,
        );
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn set(values: &[&str]) -> IndexSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_filters_for_query_builds_or_of_streams() {
        let filter = filters_for_query(&["s1", "s2"]).unwrap();
        assert_eq!(
            serde_json::to_value(&filter).unwrap(),
            json!({
                "type": "or",
                "filters": [
                    { "type": "stream", "id": "s1" },
                    { "type": "stream", "id": "s2" }
                ]
            })
        );
    }

    #[test]
    fn test_empty_selections_yield_no_filter() {
        let none: [&str; 0] = [];
        assert!(filters_for_query(&none).is_none());
        assert!(category_filters_for_query(&none).is_none());
        assert!(new_filters_for_query(&none, &none).is_none());
    }

    #[test]
    fn test_new_filters_puts_streams_before_categories() {
        let filter = new_filters_for_query(&["s1"], &["firewall", "auth"]).unwrap();
        assert_eq!(
            filter,
            FilterNode::Or {
                filters: vec![
                    FilterNode::stream("s1"),
                    FilterNode::stream_category("firewall"),
                    FilterNode::stream_category("auth"),
                ]
            }
        );
    }

    #[test]
    fn test_new_filters_delegates_for_single_selection() {
        let none: [&str; 0] = [];
        assert_eq!(
            new_filters_for_query(&["s1"], &none),
            filters_for_query(&["s1"])
        );
        assert_eq!(
            new_filters_for_query(&none, &["auth"]),
            category_filters_for_query(&["auth"])
        );
    }

    #[test]
    fn test_stream_set_from_single_leaf() {
        let filter: FilterNode = serde_json::from_value(json!({
            "type": "or",
            "filters": [{ "type": "stream", "id": "s1" }]
        }))
        .unwrap();
        assert_eq!(filters_to_stream_set(Some(&filter)), set(&["s1"]));
        assert!(filters_to_stream_category_set(Some(&filter)).is_empty());
    }

    #[test]
    fn test_walkers_descend_through_nested_combinators() {
        let filter: FilterNode = serde_json::from_value(json!({
            "type": "and",
            "filters": [
                { "type": "or", "filters": [
                    { "type": "stream", "id": "a" },
                    { "type": "stream_category", "category": "web" }
                ]},
                { "type": "or" },
                { "type": "stream", "id": "b" },
                { "type": "stream", "id": "a" }
            ]
        }))
        .unwrap();
        assert_eq!(filters_to_stream_set(Some(&filter)), set(&["a", "b"]));
        assert_eq!(filters_to_stream_category_set(Some(&filter)), set(&["web"]));
    }

    #[test]
    fn test_walkers_keep_first_seen_order() {
        let filter = new_filters_for_query(&["s3", "s1", "s2", "s1"], &["web", "auth"]);
        let streams: Vec<String> = filters_to_stream_set(filter.as_ref()).into_iter().collect();
        let categories: Vec<String> = filters_to_stream_category_set(filter.as_ref())
            .into_iter()
            .collect();
        assert_eq!(streams, vec!["s3", "s1", "s2"]);
        assert_eq!(categories, vec!["web", "auth"]);
    }

    #[test]
    fn test_walkers_on_missing_root() {
        assert!(filters_to_stream_set(None).is_empty());
        assert!(filters_to_stream_category_set(None).is_empty());
    }

    #[test]
    fn test_unknown_filter_type_is_rejected() {
        let result: Result<FilterNode, _> =
            serde_json::from_value(json!({ "type": "query_string", "query": "x" }));
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_selection_round_trips_through_filter(
            streams in prop::collection::vec("s[0-9a-f]{1,6}", 1..8),
            categories in prop::collection::vec("c[a-z]{1,6}", 1..8),
        ) {
            let filter = new_filters_for_query(&streams, &categories);

            let expected_streams: IndexSet<String> = streams.iter().cloned().collect();
            let expected_categories: IndexSet<String> = categories.iter().cloned().collect();

            prop_assert_eq!(filters_to_stream_set(filter.as_ref()), expected_streams);
            prop_assert_eq!(filters_to_stream_category_set(filter.as_ref()), expected_categories);
        }
    }
}
