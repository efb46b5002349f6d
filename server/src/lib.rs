//! Careers Site Server
//!
//! Serves the careers listing, job detail, blog and contact endpoints as
//! JSON, backed by the CMS through `careers-client`.

pub mod dto;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use careers_client::CmsClient;
use tower_http::trace::TraceLayer;

/// Shared application state
pub struct AppState {
    pub cms: CmsClient,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/careers", get(routes::search_jobs))
        .route("/careers/filter", get(routes::apply_filter))
        .route("/careers/{id}", get(routes::job_detail))
        .route("/blog", get(routes::blog_list))
        .route("/blog/{slug}", get(routes::blog_post))
        .route("/contact", post(routes::contact))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
