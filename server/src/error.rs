use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use careers_client::CmsError;
use careers_common::ValidationErrors;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    /// The CMS failed. `retry` is the URL the user can hit to try again.
    #[error("upstream CMS error: {source}")]
    Upstream {
        source: CmsError,
        retry: Option<String>,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl AppError {
    pub fn with_retry(self, href: String) -> Self {
        match self {
            AppError::Upstream { source, .. } => AppError::Upstream {
                source,
                retry: Some(href),
            },
            other => other,
        }
    }
}

impl From<CmsError> for AppError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::Invalid(errors) => AppError::Invalid(errors),
            CmsError::NotFound(what) => AppError::NotFound(what),
            err if err.is_not_found() => AppError::NotFound("document".to_string()),
            source => AppError::Upstream {
                source,
                retry: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Upstream { source, retry } => {
                error!(error = %source, "cms call failed");
                let body = json!({
                    "error": {
                        "status": source.status(),
                        "message": "We couldn't load this content right now.",
                    },
                    "retry": retry,
                });
                (StatusCode::BAD_GATEWAY, Json(body)).into_response()
            }
            AppError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": { "status": 404, "message": format!("{what} not found") } })),
            )
                .into_response(),
            AppError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": { "status": 400, "message": message } })),
            )
                .into_response(),
            AppError::Invalid(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
        }
    }
}
