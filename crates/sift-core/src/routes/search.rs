//! Search page URLs with query parameters.
//!
//! These build unqualified paths; [`Routes`](super::Routes) applies the base
//! path on top.

use serde::{Deserialize, Serialize};
use url::form_urlencoded::Serializer;

use crate::query::{RelativeRange, TimeRange};

pub const SEARCH: &str = "/search";
pub const STREAMS: &str = "/streams";

/// Time range as it appears in search page URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoutesTimeRange {
    Relative { relative: u64 },
    Absolute { from: String, to: String },
    Keyword { keyword: String },
}

impl RoutesTimeRange {
    pub fn range_type(&self) -> &'static str {
        match self {
            Self::Relative { .. } => "relative",
            Self::Absolute { .. } => "absolute",
            Self::Keyword { .. } => "keyword",
        }
    }

    fn append_to(&self, params: &mut Serializer<'_, String>) {
        params.append_pair("rangetype", self.range_type());
        match self {
            Self::Relative { relative } => {
                params.append_pair("relative", &relative.to_string());
            }
            Self::Absolute { from, to } => {
                params.append_pair("from", from);
                params.append_pair("to", to);
            }
            Self::Keyword { keyword } => {
                params.append_pair("keyword", keyword);
            }
        }
    }
}

impl From<&TimeRange> for RoutesTimeRange {
    fn from(timerange: &TimeRange) -> Self {
        match timerange {
            TimeRange::Relative(RelativeRange::StartOnly { range }) => {
                Self::Relative { relative: *range }
            }
            TimeRange::Relative(RelativeRange::WithEnd { from, .. }) => {
                Self::Relative { relative: *from }
            }
            TimeRange::Absolute { from, to } => Self::Absolute {
                from: from.clone(),
                to: to.clone(),
            },
            TimeRange::Keyword { keyword, .. } => Self::Keyword {
                keyword: keyword.clone(),
            },
        }
    }
}

fn with_query(path: &str, params: Serializer<'_, String>) -> String {
    let mut params = params;
    let query = params.finish();
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

/// `/search` with the query, range and stream selection as parameters.
pub fn search_with_query(
    query: &str,
    timerange: Option<&RoutesTimeRange>,
    streams: Option<&[String]>,
    stream_categories: Option<&[String]>,
) -> String {
    let mut params = Serializer::new(String::new());
    params.append_pair("q", query);
    if let Some(timerange) = timerange {
        timerange.append_to(&mut params);
    }
    if let Some(streams) = streams {
        params.append_pair("streams", &streams.join(","));
    }
    if let Some(categories) = stream_categories {
        params.append_pair("stream_categories", &categories.join(","));
    }
    with_query(SEARCH, params)
}

fn common_search_url(
    resource: &str,
    query: Option<&str>,
    timerange: Option<&RoutesTimeRange>,
    resolution: Option<&str>,
) -> String {
    let mut params = Serializer::new(String::new());
    if let Some(query) = query {
        params.append_pair("q", query);
    }
    if let Some(resolution) = resolution {
        params.append_pair("interval", resolution);
    }
    if let Some(timerange) = timerange {
        timerange.append_to(&mut params);
    }
    with_query(resource, params)
}

pub fn search(query: &str, timerange: Option<&RoutesTimeRange>, resolution: Option<&str>) -> String {
    common_search_url(SEARCH, Some(query), timerange, resolution)
}

pub fn stream_search(
    stream_id: &str,
    query: Option<&str>,
    timerange: Option<&RoutesTimeRange>,
    resolution: Option<&str>,
) -> String {
    common_search_url(
        &format!("{STREAMS}/{stream_id}/search"),
        query,
        timerange,
        resolution,
    )
}

/// Extractor creation page, optionally pre-filled from an example message.
pub fn new_extractor(
    node_id: &str,
    input_id: &str,
    extractor_type: Option<&str>,
    field: Option<&str>,
    index: Option<&str>,
    message_id: Option<&str>,
) -> String {
    let mut params = Serializer::new(String::new());
    let optional = [
        ("extractor_type", extractor_type),
        ("field", field),
        ("example_index", index),
        ("example_id", message_id),
    ];
    for (key, value) in optional {
        if let Some(value) = value {
            params.append_pair(key, value);
        }
    }
    with_query(
        &format!("/system/inputs/{node_id}/{input_id}/extractors/new"),
        params,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_with_query_relative() {
        let url = search_with_query(
            "source:web AND level:3",
            Some(&RoutesTimeRange::Relative { relative: 300 }),
            Some(&["s1".to_string(), "s2".to_string()]),
            None,
        );
        assert_eq!(
            url,
            "/search?q=source%3Aweb+AND+level%3A3&rangetype=relative&relative=300&streams=s1%2Cs2"
        );
    }

    #[test]
    fn test_search_with_query_absolute_and_categories() {
        let url = search_with_query(
            "",
            Some(&RoutesTimeRange::Absolute {
                from: "2024-01-01 00:00:00".into(),
                to: "2024-01-02 00:00:00".into(),
            }),
            None,
            Some(&["auth".to_string()]),
        );
        assert_eq!(
            url,
            "/search?q=&rangetype=absolute&from=2024-01-01+00%3A00%3A00&to=2024-01-02+00%3A00%3A00&stream_categories=auth"
        );
    }

    #[test]
    fn test_search_with_query_keyword_only() {
        let url = search_with_query(
            "*",
            Some(&RoutesTimeRange::Keyword {
                keyword: "last week".into(),
            }),
            None,
            None,
        );
        assert_eq!(url, "/search?q=*&rangetype=keyword&keyword=last+week");
    }

    #[test]
    fn test_search_carries_interval() {
        let url = search("", Some(&RoutesTimeRange::Relative { relative: 300 }), Some("hour"));
        assert_eq!(url, "/search?q=&interval=hour&rangetype=relative&relative=300");
    }

    #[test]
    fn test_stream_search_without_parameters() {
        assert_eq!(stream_search("abc", None, None, None), "/streams/abc/search");
    }

    #[test]
    fn test_new_extractor_skips_missing_parameters() {
        assert_eq!(
            new_extractor("n1", "i1", None, None, None, None),
            "/system/inputs/n1/i1/extractors/new"
        );
        assert_eq!(
            new_extractor("n1", "i1", Some("regex"), Some("message"), None, Some("m1")),
            "/system/inputs/n1/i1/extractors/new?extractor_type=regex&field=message&example_id=m1"
        );
    }

    #[test]
    fn test_routes_time_range_from_query_time_range() {
        assert_eq!(
            RoutesTimeRange::from(&TimeRange::relative(60)),
            RoutesTimeRange::Relative { relative: 60 }
        );
        assert_eq!(
            RoutesTimeRange::from(&TimeRange::keyword("today")).range_type(),
            "keyword"
        );
    }
}
