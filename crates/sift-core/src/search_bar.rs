//! # Search Bar
//!
//! The search bar edits four things on the active query: the query string,
//! the time range and the stream / stream-category selection. Submitting
//! either produces a changed query that has to be stored and executed, or
//! leaves the query as is and re-executes it.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::filter::{filters_to_stream_category_set, filters_to_stream_set, new_filters_for_query};
use crate::query::{create_elasticsearch_query_string, Query, TimeRange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBarValues {
    pub query_string: String,
    pub timerange: TimeRange,
    #[serde(default)]
    pub streams: Vec<String>,
    #[serde(default)]
    pub stream_categories: Vec<String>,
}

/// What a submit did to the active query.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The query changed; store it and execute the search.
    Updated(Query),
    /// Nothing changed; execute the active query again.
    Unchanged,
}

/// Form values for `query`. Streams and categories keep their order in the
/// filter tree, so submitting the untouched form rebuilds the same tree.
pub fn initial_form_values(query: &Query) -> SearchBarValues {
    SearchBarValues {
        query_string: query.query().query_string().to_string(),
        timerange: query.timerange().clone(),
        streams: filters_to_stream_set(query.filter()).into_iter().collect(),
        stream_categories: filters_to_stream_category_set(query.filter())
            .into_iter()
            .collect(),
    }
}

/// Apply submitted form values to `current`.
///
/// The query keeps its id, search types and search filters. The stream
/// filter tree is rebuilt from the selection, so an empty selection clears it.
pub fn submit(current: &Query, values: &SearchBarValues) -> Result<SubmitOutcome, QueryError> {
    let next = current
        .to_builder()
        .timerange(values.timerange.clone())
        .filter(new_filters_for_query(&values.streams[..], &values.stream_categories[..]))
        .query(create_elasticsearch_query_string(values.query_string.as_str()))
        .build()?;

    if current.equals(Some(&next)) {
        Ok(SubmitOutcome::Unchanged)
    } else {
        Ok(SubmitOutcome::Updated(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterNode;

    fn current() -> Query {
        Query::builder()
            .id("q1")
            .query(create_elasticsearch_query_string("level:3"))
            .timerange(TimeRange::relative(300))
            .filter(new_filters_for_query(&["s2", "s1"], &["auth"]))
            .build()
            .unwrap()
    }

    #[test]
    fn test_initial_values_read_filter_tree() {
        let values = initial_form_values(&current());
        assert_eq!(values.query_string, "level:3");
        assert_eq!(values.timerange, TimeRange::relative(300));
        assert_eq!(values.streams, vec!["s2", "s1"]);
        assert_eq!(values.stream_categories, vec!["auth"]);
    }

    #[test]
    fn test_submit_without_changes_is_unchanged() {
        let query = Query::builder()
            .id("q1")
            .query(create_elasticsearch_query_string("level:3"))
            .timerange(TimeRange::relative(300))
            .filter(new_filters_for_query(&["s1"], &[] as &[&str]))
            .build()
            .unwrap();
        let values = initial_form_values(&query);
        assert_eq!(submit(&query, &values).unwrap(), SubmitOutcome::Unchanged);
    }

    #[test]
    fn test_untouched_form_with_unsorted_selection_is_unchanged() {
        let query = Query::builder()
            .id("q1")
            .query(create_elasticsearch_query_string("level:3"))
            .timerange(TimeRange::relative(300))
            .filter(new_filters_for_query(&["s3", "s1", "s2"], &["web", "auth"]))
            .build()
            .unwrap();
        let values = initial_form_values(&query);
        assert_eq!(values.streams, vec!["s3", "s1", "s2"]);
        assert_eq!(values.stream_categories, vec!["web", "auth"]);
        assert_eq!(submit(&query, &values).unwrap(), SubmitOutcome::Unchanged);
    }

    #[test]
    fn test_submit_with_new_query_string_updates() {
        let query = current();
        let mut values = initial_form_values(&query);
        values.query_string = "level:4".into();

        match submit(&query, &values).unwrap() {
            SubmitOutcome::Updated(next) => {
                assert_eq!(next.id(), "q1");
                assert_eq!(next.query().query_string(), "level:4");
                assert_eq!(next.timerange(), query.timerange());
            }
            SubmitOutcome::Unchanged => panic!("expected an updated query"),
        }
    }

    #[test]
    fn test_submit_clearing_streams_drops_filter() {
        let query = current();
        let values = SearchBarValues {
            query_string: "level:3".into(),
            timerange: TimeRange::relative(300),
            streams: vec![],
            stream_categories: vec![],
        };

        let SubmitOutcome::Updated(next) = submit(&query, &values).unwrap() else {
            panic!("expected an updated query");
        };
        assert!(next.filter().is_none());
    }

    #[test]
    fn test_submit_rebuilds_filter_from_selection() {
        let query = current();
        let values = SearchBarValues {
            query_string: "level:3".into(),
            timerange: TimeRange::keyword("yesterday"),
            streams: vec!["s9".into()],
            stream_categories: vec![],
        };

        let SubmitOutcome::Updated(next) = submit(&query, &values).unwrap() else {
            panic!("expected an updated query");
        };
        assert_eq!(next.timerange().type_name(), "keyword");
        assert_eq!(
            next.filter(),
            Some(&FilterNode::Or {
                filters: vec![FilterNode::stream("s9")]
            })
        );
    }

    #[test]
    fn test_values_decode_without_selections() {
        let values: SearchBarValues = serde_json::from_value(serde_json::json!({
            "query_string": "*",
            "timerange": { "type": "relative", "range": 60 }
        }))
        .unwrap();
        assert!(values.streams.is_empty());
        assert!(values.stream_categories.is_empty());
    }
}
