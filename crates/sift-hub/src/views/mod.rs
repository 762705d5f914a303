//! # Views
//!
//! In-memory store of saved views. A view is an ordered list of queries plus
//! a counter of how many times one of them was executed from the search bar.

use serde::{Deserialize, Serialize};
use sift_core::search_bar::{self, SearchBarValues, SubmitOutcome};
use sift_core::{create_elasticsearch_query_string, Query, QueryError, TimeRange};
use thiserror::Error;
use tokio::sync::RwLock;

/// Range for the query a new view starts with.
pub const DEFAULT_RELATIVE_RANGE: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    pub title: String,
    pub queries: Vec<Query>,
    pub executions: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl View {
    pub fn query(&self, query_id: &str) -> Option<&Query> {
        self.queries.iter().find(|q| q.id() == query_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateViewRequest {
    pub title: String,
    #[serde(default)]
    pub queries: Option<Vec<Query>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitResponse {
    Updated { query: Query, executions: u64 },
    Unchanged { query: Query, executions: u64 },
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("view '{0}' not found")]
    ViewNotFound(String),

    #[error("query '{query}' not found in view '{view}'")]
    QueryNotFound { view: String, query: String },

    #[error(transparent)]
    Query(#[from] QueryError),
}

/// A fresh query: new id, empty query string, last five minutes.
pub fn default_query() -> Result<Query, QueryError> {
    Query::builder()
        .new_id()
        .query(create_elasticsearch_query_string(""))
        .timerange(TimeRange::relative(DEFAULT_RELATIVE_RANGE))
        .build()
}

pub struct ViewManager {
    views: RwLock<Vec<View>>,
}

impl ViewManager {
    pub fn new() -> Self {
        Self {
            views: RwLock::new(Vec::new()),
        }
    }

    pub async fn list(&self) -> Vec<View> {
        self.views.read().await.clone()
    }

    pub async fn create(&self, req: CreateViewRequest) -> Result<View, ViewError> {
        let queries = match req.queries {
            Some(queries) if !queries.is_empty() => queries,
            _ => vec![default_query()?],
        };
        let now = chrono::Utc::now().to_rfc3339();
        let view = View {
            id: format!("view-{}", uuid::Uuid::new_v4().as_simple()),
            title: req.title,
            queries,
            executions: 0,
            created_at: now.clone(),
            updated_at: now,
        };
        self.views.write().await.push(view.clone());
        tracing::info!("Created view {} ({} queries)", view.id, view.queries.len());
        Ok(view)
    }

    pub async fn get(&self, id: &str) -> Option<View> {
        self.views.read().await.iter().find(|v| v.id == id).cloned()
    }

    pub async fn delete(&self, id: &str) -> Result<(), ViewError> {
        let mut views = self.views.write().await;
        let idx = views
            .iter()
            .position(|v| v.id == id)
            .ok_or_else(|| ViewError::ViewNotFound(id.to_string()))?;
        views.remove(idx);
        Ok(())
    }

    pub async fn form_values(&self, id: &str, query_id: &str) -> Result<SearchBarValues, ViewError> {
        let views = self.views.read().await;
        let view = views
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| ViewError::ViewNotFound(id.to_string()))?;
        let query = view.query(query_id).ok_or_else(|| ViewError::QueryNotFound {
            view: id.to_string(),
            query: query_id.to_string(),
        })?;
        Ok(search_bar::initial_form_values(query))
    }

    /// Apply search-bar values to one query of a view.
    ///
    /// A changed query replaces the stored one. Both outcomes count as an
    /// execution.
    pub async fn submit(
        &self,
        id: &str,
        query_id: &str,
        values: &SearchBarValues,
    ) -> Result<SubmitResponse, ViewError> {
        let mut views = self.views.write().await;
        let view = views
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| ViewError::ViewNotFound(id.to_string()))?;
        let slot = view
            .queries
            .iter()
            .position(|q| q.id() == query_id)
            .ok_or_else(|| ViewError::QueryNotFound {
                view: id.to_string(),
                query: query_id.to_string(),
            })?;

        let outcome = search_bar::submit(&view.queries[slot], values)?;
        view.executions += 1;
        let executions = view.executions;

        Ok(match outcome {
            SubmitOutcome::Updated(query) => {
                tracing::info!("View {}: query {} updated, executing", id, query_id);
                view.queries[slot] = query.clone();
                view.updated_at = chrono::Utc::now().to_rfc3339();
                SubmitResponse::Updated { query, executions }
            }
            SubmitOutcome::Unchanged => {
                tracing::debug!("View {}: query {} unchanged, re-executing", id, query_id);
                SubmitResponse::Unchanged {
                    query: view.queries[slot].clone(),
                    executions,
                }
            }
        })
    }
}

impl Default for ViewManager {
    fn default() -> Self {
        Self::new()
    }
}
