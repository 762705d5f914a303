//! # Query Tools
//!
//! Stateless helpers behind `/api/queries`: composing and decomposing stream
//! filter trees and comparing two queries.

use serde::{Deserialize, Serialize};
use sift_core::{
    filters_to_stream_category_set, filters_to_stream_set, new_filters_for_query, FilterNode,
    Query,
};

#[derive(Debug, Clone, Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub streams: Vec<String>,
    #[serde(default)]
    pub stream_categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterResponse {
    pub filter: Option<FilterNode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecomposeRequest {
    #[serde(default)]
    pub filter: Option<FilterNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecomposeResponse {
    pub streams: Vec<String>,
    pub stream_categories: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CompareRequest {
    pub left: Query,
    #[serde(default)]
    pub right: Option<Query>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompareResponse {
    pub equal: bool,
    pub needs_execution: bool,
}

pub fn compose(req: &FilterRequest) -> FilterResponse {
    FilterResponse {
        filter: new_filters_for_query(&req.streams[..], &req.stream_categories[..]),
    }
}

pub fn decompose(req: &DecomposeRequest) -> DecomposeResponse {
    let filter = req.filter.as_ref();
    DecomposeResponse {
        streams: filters_to_stream_set(filter).into_iter().collect(),
        stream_categories: filters_to_stream_category_set(filter).into_iter().collect(),
    }
}

pub fn compare(req: &CompareRequest) -> CompareResponse {
    let equal = req.left.equals(req.right.as_ref());
    CompareResponse {
        equal,
        needs_execution: !equal,
    }
}
