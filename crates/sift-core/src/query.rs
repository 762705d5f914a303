//! # Search Query
//!
//! One unit of search execution context: a query string, a time range, an
//! optional stream filter tree and the search types the backend should
//! compute. A [`Query`] is immutable once built; derived queries go through
//! [`Query::to_builder`].

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::filter::FilterNode;
use crate::id::generate_id;

pub type QueryId = String;

/// A named search filter. Opaque to the front-end, order-significant.
pub type SearchFilter = serde_json::Value;

/// A backend search-type request (aggregation pivot, message list, ...).
pub type SearchType = serde_json::Value;

/// The query string, tagged by its language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryString {
    Elasticsearch { query_string: String },
}

impl QueryString {
    pub fn query_string(&self) -> &str {
        match self {
            Self::Elasticsearch { query_string } => query_string,
        }
    }
}

impl Default for QueryString {
    fn default() -> Self {
        create_elasticsearch_query_string("")
    }
}

pub fn create_elasticsearch_query_string(query: impl Into<String>) -> QueryString {
    QueryString::Elasticsearch {
        query_string: query.into(),
    }
}

/// Search window. The `type` tag decides which fields are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeRange {
    Relative(RelativeRange),
    Absolute {
        from: String,
        to: String,
    },
    Keyword {
        keyword: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timezone: Option<String>,
    },
}

/// Relative ranges are either "the last `range` seconds" or an explicit
/// `from`/`to` pair of seconds-ago offsets. A range mixing both shapes is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum RelativeRange {
    StartOnly {
        range: u64,
    },
    WithEnd {
        from: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        to: Option<u64>,
    },
}

impl TimeRange {
    pub fn relative(seconds: u64) -> Self {
        Self::Relative(RelativeRange::StartOnly { range: seconds })
    }

    pub fn absolute(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::Absolute {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self::Keyword {
            keyword: keyword.into(),
            from: None,
            to: None,
            timezone: None,
        }
    }

    /// The wire `type` tag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Relative(_) => "relative",
            Self::Absolute { .. } => "absolute",
            Self::Keyword { .. } => "keyword",
        }
    }
}

/// An immutable search query.
///
/// Equality is deep and structural; it decides whether a search has to be
/// re-executed. `filter` and `filters` decode `null` and a missing key to the
/// same `None`, so the two are interchangeable on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    id: QueryId,
    query: QueryString,
    timerange: TimeRange,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<FilterNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filters: Option<Vec<SearchFilter>>,
    #[serde(rename = "search_types", default)]
    search_types: Vec<SearchType>,
}

impl Query {
    /// A builder seeded with an empty search-type list.
    pub fn builder() -> QueryBuilder {
        QueryBuilder::default()
    }

    pub fn to_builder(&self) -> QueryBuilder {
        QueryBuilder {
            id: Some(self.id.clone()),
            query: Some(self.query.clone()),
            timerange: Some(self.timerange.clone()),
            filter: self.filter.clone(),
            filters: self.filters.clone(),
            search_types: self.search_types.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn query(&self) -> &QueryString {
        &self.query
    }

    pub fn timerange(&self) -> &TimeRange {
        &self.timerange
    }

    pub fn filter(&self) -> Option<&FilterNode> {
        self.filter.as_ref()
    }

    pub fn filters(&self) -> Option<&[SearchFilter]> {
        self.filters.as_deref()
    }

    pub fn search_types(&self) -> &[SearchType] {
        &self.search_types
    }

    /// Structural equality; a missing `other` is never equal.
    pub fn equals(&self, other: Option<&Query>) -> bool {
        other.is_some_and(|other| self == other)
    }

    pub fn to_json(&self) -> Result<serde_json::Value, QueryError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, QueryError> {
        Ok(serde_json::from_value(value)?)
    }
}

/// Accumulates query fields. Every setter consumes the builder and hands back
/// a new one; clone it to branch.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    id: Option<QueryId>,
    query: Option<QueryString>,
    timerange: Option<TimeRange>,
    filter: Option<FilterNode>,
    filters: Option<Vec<SearchFilter>>,
    search_types: Vec<SearchType>,
}

impl QueryBuilder {
    pub fn id(self, id: impl Into<QueryId>) -> Self {
        Self {
            id: Some(id.into()),
            ..self
        }
    }

    /// Assign a freshly generated id.
    pub fn new_id(self) -> Self {
        self.id(generate_id())
    }

    pub fn query(self, query: QueryString) -> Self {
        Self {
            query: Some(query),
            ..self
        }
    }

    pub fn timerange(self, timerange: TimeRange) -> Self {
        Self {
            timerange: Some(timerange),
            ..self
        }
    }

    /// Set or clear (`None`) the stream filter tree.
    pub fn filter(self, filter: Option<FilterNode>) -> Self {
        Self {
            filter,
            ..self
        }
    }

    pub fn filters(self, filters: Option<Vec<SearchFilter>>) -> Self {
        Self {
            filters,
            ..self
        }
    }

    pub fn search_types(self, search_types: Vec<SearchType>) -> Self {
        Self {
            search_types,
            ..self
        }
    }

    pub fn build(self) -> Result<Query, QueryError> {
        Ok(Query {
            id: self.id.ok_or(QueryError::MissingField("id"))?,
            query: self.query.ok_or(QueryError::MissingField("query"))?,
            timerange: self.timerange.ok_or(QueryError::MissingField("timerange"))?,
            filter: self.filter,
            filters: self.filters,
            search_types: self.search_types,
        })
    }
}
