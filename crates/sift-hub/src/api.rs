//! # API Handlers
//!
//! Axum handlers for routes, query tools and views.

use crate::error::ApiError;
use crate::queries::{
    self, CompareRequest, CompareResponse, DecomposeRequest, DecomposeResponse, FilterRequest,
    FilterResponse,
};
use crate::views::{CreateViewRequest, SubmitResponse, View};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sift_core::routes::RoutesTimeRange;
use sift_core::search_bar::SearchBarValues;
use sift_core::RouteEntry;
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct UrlResponse {
    pub url: String,
}

/// Split a comma-separated parameter, dropping empty items.
fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

// =============================================================================
// Routes
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteInfo {
    pub name: String,
    pub kind: String,
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteListing {
    pub prefix: String,
    pub routes: Vec<RouteInfo>,
    pub plugins: Vec<String>,
}

pub async fn list_routes(State(state): State<Arc<AppState>>) -> Json<RouteListing> {
    let routes = state
        .routes
        .qualified()
        .flatten()
        .into_iter()
        .map(|(name, entry)| RouteInfo {
            name,
            kind: match entry {
                RouteEntry::Literal(_) => "literal".into(),
                _ => "generator".into(),
            },
            path: entry.as_literal().map(str::to_string),
        })
        .collect();

    Json(RouteListing {
        prefix: state.routes.prefix().to_string(),
        routes,
        plugins: state.routes.plugins().keys().map(str::to_string).collect(),
    })
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
    pub name: String,
    pub args: Option<String>,
}

pub async fn resolve_route(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ResolveParams>,
) -> Result<Json<UrlResponse>, ApiError> {
    let args = split_list(params.args.as_deref());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let url = state.routes.resolve(&params.name, &args)?;
    Ok(Json(UrlResponse { url }))
}

#[derive(Debug, Deserialize)]
pub struct ArgsParams {
    pub args: Option<String>,
}

pub async fn resolve_plugin_route(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(params): Query<ArgsParams>,
) -> Result<Json<UrlResponse>, ApiError> {
    let args = split_list(params.args.as_deref());
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let url = state.routes.plugin_route(&key)?.resolve(&args)?;
    Ok(Json(UrlResponse { url }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchUrlParams {
    #[serde(default)]
    pub q: String,
    pub relative: Option<u64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub keyword: Option<String>,
    pub streams: Option<String>,
    pub stream_categories: Option<String>,
}

impl SearchUrlParams {
    fn timerange(&self) -> Result<Option<RoutesTimeRange>, ApiError> {
        if let Some(relative) = self.relative {
            return Ok(Some(RoutesTimeRange::Relative { relative }));
        }
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => {
                return Ok(Some(RoutesTimeRange::Absolute {
                    from: from.clone(),
                    to: to.clone(),
                }))
            }
            (Some(_), None) | (None, Some(_)) => {
                return Err(ApiError::BadRequest(
                    "absolute range needs both 'from' and 'to'".into(),
                ))
            }
            (None, None) => {}
        }
        Ok(self
            .keyword
            .clone()
            .map(|keyword| RoutesTimeRange::Keyword { keyword }))
    }
}

pub async fn search_url(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchUrlParams>,
) -> Result<Json<UrlResponse>, ApiError> {
    let timerange = params.timerange()?;
    let streams = params
        .streams
        .as_deref()
        .map(|s| split_list(Some(s)));
    let categories = params
        .stream_categories
        .as_deref()
        .map(|s| split_list(Some(s)));

    let url = state.routes.search_with_query(
        &params.q,
        timerange.as_ref(),
        streams.as_deref(),
        categories.as_deref(),
    );
    Ok(Json(UrlResponse { url }))
}

// =============================================================================
// Queries
// =============================================================================

pub async fn compose_filters(Json(req): Json<FilterRequest>) -> Json<FilterResponse> {
    Json(queries::compose(&req))
}

pub async fn decompose_filters(Json(req): Json<DecomposeRequest>) -> Json<DecomposeResponse> {
    Json(queries::decompose(&req))
}

pub async fn compare_queries(Json(req): Json<CompareRequest>) -> Json<CompareResponse> {
    Json(queries::compare(&req))
}

// =============================================================================
// Views
// =============================================================================

pub async fn list_views(State(state): State<Arc<AppState>>) -> Json<Vec<View>> {
    Json(state.views.list().await)
}

pub async fn create_view(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateViewRequest>,
) -> Result<(StatusCode, Json<View>), ApiError> {
    let view = state.views.create(req).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<View>, ApiError> {
    state
        .views
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("view '{id}' not found")))
}

pub async fn delete_view(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.views.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_form_values(
    State(state): State<Arc<AppState>>,
    Path((id, query_id)): Path<(String, String)>,
) -> Result<Json<SearchBarValues>, ApiError> {
    Ok(Json(state.views.form_values(&id, &query_id).await?))
}

pub async fn submit_search(
    State(state): State<Arc<AppState>>,
    Path((id, query_id)): Path<(String, String)>,
    Json(values): Json<SearchBarValues>,
) -> Result<Json<SubmitResponse>, ApiError> {
    Ok(Json(state.views.submit(&id, &query_id, &values).await?))
}
