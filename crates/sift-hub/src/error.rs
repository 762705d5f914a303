//! # Errors
//!
//! `ApiError` is what handlers return; it renders as a status code plus
//! `{ "error": "..." }`. `StartupError` covers everything that can stop the
//! server before it binds.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sift_core::{QueryError, RouteError};
use thiserror::Error;

use crate::views::ViewError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Route(#[from] RouteError),

    #[error(transparent)]
    View(#[from] ViewError),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Query(_) => StatusCode::BAD_REQUEST,
            Self::Route(RouteError::PluginRouteNotFound(_) | RouteError::UnknownRoute(_)) => {
                StatusCode::NOT_FOUND
            }
            Self::Route(_) => StatusCode::BAD_REQUEST,
            Self::View(ViewError::Query(_)) => StatusCode::BAD_REQUEST,
            Self::View(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_client_error() {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        let body = Json(ErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid bind address '{addr}': {source}")]
    Bind {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Route(#[from] RouteError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(RouteError::PluginRouteNotFound("X".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(RouteError::NotAPath("SYSTEM".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(QueryError::MissingField("id")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ViewError::ViewNotFound("v".into())).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_plugin_route_message() {
        let err = ApiError::from(RouteError::PluginRouteNotFound("REPORTS".into()));
        assert_eq!(err.to_string(), "Could not find plugin route 'REPORTS'.");
    }
}
