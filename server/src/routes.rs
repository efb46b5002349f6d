use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
    response::Redirect,
};
use careers_common::{ContactSubmission, FilterKey, JobSearchParams, PostListParams};
use serde_json::{Value, json};
use tracing::info;
use url::form_urlencoded;

use crate::AppState;
use crate::dto::{
    BlogListResponse, JobDetail, PostDetail, SearchResponse, blog_href, careers_href, job_href,
    post_href,
};
use crate::error::AppError;

/// Handler for GET / (root)
pub async fn root() -> &'static str {
    "Careers API\n\nEndpoints:\n  GET  /careers?q=&employmentType=&location=&minSalary=&maxSalary=&sort=&page=\n  GET  /careers/filter?set=<key>&to=<value>&<current filters>\n  GET  /careers/{id}\n  GET  /blog?page=\n  GET  /blog/{slug}\n  POST /contact\n"
}

/// Handler for GET /careers
///
/// The query string is the whole filter state. Upstream failures come back
/// as 502 with a retry link; zero matches is a normal 200 with `empty: true`.
pub async fn search_jobs(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<SearchResponse>, AppError> {
    let params = JobSearchParams::from_query_string(raw.as_deref().unwrap_or_default());
    let results = state
        .cms
        .search_jobs(&params)
        .await
        .map_err(|e| AppError::from(e).with_retry(careers_href(&params)))?;
    Ok(Json(SearchResponse::new(params, &results)))
}

/// Handler for GET /careers/filter
///
/// Applies one filter change (`set`/`to`) on top of the current filters and
/// redirects to the resulting listing URL.
pub async fn apply_filter(RawQuery(raw): RawQuery) -> Result<Redirect, AppError> {
    let raw = raw.unwrap_or_default();
    let mut key = None;
    let mut value = None;
    let mut current = form_urlencoded::Serializer::new(String::new());
    for (k, v) in form_urlencoded::parse(raw.as_bytes()) {
        match &*k {
            "set" => key = Some(v.into_owned()),
            "to" => value = Some(v.into_owned()),
            _ => {
                current.append_pair(&k, &v);
            }
        }
    }

    let key = key.ok_or_else(|| AppError::BadRequest("missing `set`".to_string()))?;
    let filter = FilterKey::from_name(&key)
        .ok_or_else(|| AppError::BadRequest(format!("unknown filter `{key}`")))?;

    let params = JobSearchParams::from_query_string(&current.finish()).with_filter(filter, value);
    Ok(Redirect::to(&careers_href(&params)))
}

/// Handler for GET /careers/{id}
pub async fn job_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<JobDetail>, AppError> {
    let job = state
        .cms
        .job(&id)
        .await
        .map_err(|e| AppError::from(e).with_retry(job_href(&id)))?;
    Ok(Json(JobDetail::from(&job)))
}

/// Handler for GET /blog
pub async fn blog_list(
    State(state): State<Arc<AppState>>,
    RawQuery(raw): RawQuery,
) -> Result<Json<BlogListResponse>, AppError> {
    let params = PostListParams::from_query_string(raw.as_deref().unwrap_or_default());
    let posts = state
        .cms
        .list_posts(&params)
        .await
        .map_err(|e| AppError::from(e).with_retry(blog_href(params.page)))?;
    Ok(Json(BlogListResponse::new(&posts)))
}

/// Handler for GET /blog/{slug}
pub async fn blog_post(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, AppError> {
    let post = state
        .cms
        .post_by_slug(&slug)
        .await
        .map_err(|e| AppError::from(e).with_retry(post_href(&slug)))?;
    Ok(Json(PostDetail::from(&post)))
}

/// Handler for POST /contact
pub async fn contact(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ContactSubmission>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    submission.validate()?;
    state.cms.submit_contact(&submission).await?;
    info!("contact form forwarded to CMS");
    Ok((StatusCode::CREATED, Json(json!({ "ok": true }))))
}
