//! End-to-end: real server in front of a fake CMS, both on loopback.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, RawQuery},
    http::StatusCode,
    routing::{get, post},
};
use careers_client::{CmsClient, CmsConfig};
use careers_server::{AppState, app};
use serde_json::{Value, json};
use url::form_urlencoded;

fn job_json(id: u32, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "employmentType": "full-time",
        "location": "Remote",
        "salaryMin": 70000,
        "salaryMax": 95000,
        "description": { "root": { "children": [
            { "type": "paragraph", "children": [{ "type": "text", "text": "Own the search backend." }] }
        ]}},
        "benefits": ["Health", "Learning budget"],
        "status": "ACTIVE",
        "company": { "id": 9, "name": "Acme", "website": "https://acme.test", "about": "We build things." },
        "createdAt": "2024-05-01T10:00:00.000Z"
    })
}

fn envelope(docs: Vec<Value>, total_docs: u32, page: u32, total_pages: u32) -> Value {
    json!({
        "docs": docs,
        "totalDocs": total_docs,
        "limit": 10,
        "page": page,
        "totalPages": total_pages,
        "hasNextPage": page < total_pages,
        "hasPrevPage": page > 1
    })
}

fn query_pairs(raw: Option<String>) -> HashMap<String, String> {
    form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
        .into_owned()
        .collect()
}

async fn jobposts(RawQuery(raw): RawQuery) -> (StatusCode, Json<Value>) {
    let pairs = query_pairs(raw);
    if pairs.get("where[location][contains]").map(String::as_str) == Some("Explode") {
        return (StatusCode::SERVICE_UNAVAILABLE, Json(json!({ "errors": [] })));
    }
    if pairs.get("where[or][0][title][contains]").map(String::as_str) == Some("nothing") {
        return (StatusCode::OK, Json(envelope(vec![], 0, 1, 0)));
    }
    let page: u32 = pairs.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    (
        StatusCode::OK,
        Json(envelope(vec![job_json(1, "Search Engineer")], 3, page, 3)),
    )
}

async fn jobpost(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    match id.as_str() {
        "1" => (StatusCode::OK, Json(job_json(1, "Search Engineer"))),
        "boom" => (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "errors": [] }))),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "errors": [] }))),
    }
}

async fn posts(RawQuery(raw): RawQuery) -> Json<Value> {
    let pairs = query_pairs(raw);
    let post = json!({
        "id": "p1",
        "title": "Why we moved to Rust",
        "slug": "rust",
        "excerpt": "A short story.",
        "content": { "root": { "children": [
            { "type": "paragraph", "children": [{ "type": "text", "text": "It was fast." }] }
        ]}},
        "_status": "published",
        "publishedAt": "2024-02-01T00:00:00.000Z"
    });
    match pairs.get("where[slug][equals]").map(String::as_str) {
        Some("rust") | None => Json(envelope(vec![post], 1, 1, 1)),
        Some(_) => Json(envelope(vec![], 0, 1, 0)),
    }
}

/// Storage fails for one reserved address.
async fn contact_submissions(Json(body): Json<Value>) -> StatusCode {
    if body["email"] == "outage@example.com" {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::CREATED
    }
}

async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Returns the base URL of a careers server wired to a fresh fake CMS.
async fn spawn_stack() -> String {
    let cms_url = spawn(
        Router::new()
            .route("/api/jobposts", get(jobposts))
            .route("/api/jobposts/{id}", get(jobpost))
            .route("/api/posts", get(posts))
            .route("/api/contact-submissions", post(contact_submissions)),
    )
    .await;

    let config = CmsConfig::new(&cms_url)
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    let state = Arc::new(AppState {
        cms: CmsClient::new(config).unwrap(),
    });
    spawn(app(state)).await
}

fn http() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

async fn get_json(url: &str) -> (u16, Value) {
    let response = http().get(url).send().await.unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_careers_listing() {
    let base = spawn_stack().await;
    let (status, body) =
        get_json(&format!("{base}/careers?employmentType=full-time&location=Remote&page=2")).await;

    assert_eq!(status, 200);
    assert_eq!(body["empty"], false);
    assert_eq!(body["params"]["employmentType"], "full-time");
    assert_eq!(body["params"]["page"], 2);
    assert_eq!(body["query"], "employmentType=full-time&location=Remote&page=2");

    let job = &body["jobs"][0];
    assert_eq!(job["title"], "Search Engineer");
    assert_eq!(job["company"], "Acme");
    assert_eq!(job["employmentType"], "Full-time");
    assert_eq!(job["salary"], "$70,000 – $95,000");
    assert_eq!(job["href"], "/careers/1");

    let pagination = &body["pagination"];
    assert_eq!(pagination["totalPages"], 3);
    assert_eq!(
        pagination["prev"],
        "/careers?employmentType=full-time&location=Remote"
    );
    assert_eq!(
        pagination["next"],
        "/careers?employmentType=full-time&location=Remote&page=3"
    );
    assert_eq!(pagination["window"].as_array().unwrap().len(), 3);
    assert_eq!(pagination["window"][1]["current"], true);
}

#[tokio::test]
async fn test_empty_results_are_not_an_error() {
    let base = spawn_stack().await;
    let (status, body) = get_json(&format!("{base}/careers?q=nothing")).await;

    assert_eq!(status, 200);
    assert_eq!(body["empty"], true);
    assert!(body["jobs"].as_array().unwrap().is_empty());
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn test_upstream_failure_offers_retry() {
    let base = spawn_stack().await;
    let (status, body) = get_json(&format!("{base}/careers?location=Explode")).await;

    assert_eq!(status, 502);
    assert_eq!(body["error"]["status"], 503);
    assert_eq!(body["retry"], "/careers?location=Explode");
    assert!(body.get("jobs").is_none());
}

#[tokio::test]
async fn test_filter_change_redirects_to_page_one() {
    let base = spawn_stack().await;
    let response = http()
        .get(format!("{base}/careers/filter?set=location&to=Berlin&q=rust&page=4"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(
        response.headers()["location"].to_str().unwrap(),
        "/careers?q=rust&location=Berlin"
    );

    let paging = http()
        .get(format!("{base}/careers/filter?set=page&to=4&q=rust"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        paging.headers()["location"].to_str().unwrap(),
        "/careers?q=rust&page=4"
    );

    let unknown = http()
        .get(format!("{base}/careers/filter?set=colour&to=red"))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status().as_u16(), 400);
}

#[tokio::test]
async fn test_job_detail() {
    let base = spawn_stack().await;

    let (status, body) = get_json(&format!("{base}/careers/1")).await;
    assert_eq!(status, 200);
    assert_eq!(body["title"], "Search Engineer");
    assert_eq!(body["description"], "Own the search backend.");
    assert_eq!(body["benefits"], json!(["Health", "Learning budget"]));
    assert_eq!(body["companyWebsite"], "https://acme.test");

    let (status, _) = get_json(&format!("{base}/careers/99")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_job_detail_upstream_failure() {
    let base = spawn_stack().await;
    let (status, body) = get_json(&format!("{base}/careers/boom")).await;

    assert_eq!(status, 502);
    assert_eq!(body["error"]["status"], 500);
    assert_eq!(body["retry"], "/careers/boom");
}

#[tokio::test]
async fn test_blog() {
    let base = spawn_stack().await;

    let (status, body) = get_json(&format!("{base}/blog")).await;
    assert_eq!(status, 200);
    assert_eq!(body["posts"][0]["slug"], "rust");
    assert_eq!(body["posts"][0]["excerpt"], "A short story.");

    let (status, body) = get_json(&format!("{base}/blog/rust")).await;
    assert_eq!(status, 200);
    assert_eq!(body["body"], "It was fast.");

    let (status, _) = get_json(&format!("{base}/blog/missing")).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_contact_form() {
    let base = spawn_stack().await;

    let invalid = http()
        .post(format!("{base}/contact"))
        .json(&json!({ "name": "", "email": "nope", "message": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status().as_u16(), 422);
    let body: Value = invalid.json().await.unwrap();
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["name", "email", "message", "consent"]);

    let valid = http()
        .post(format!("{base}/contact"))
        .json(&json!({
            "name": "Grace",
            "email": "grace@example.com",
            "message": "Interested in the compliance training package.",
            "consent": true
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(valid.status().as_u16(), 201);
}

#[tokio::test]
async fn test_contact_upstream_failure() {
    let base = spawn_stack().await;
    let response = http()
        .post(format!("{base}/contact"))
        .json(&json!({
            "name": "Grace",
            "email": "outage@example.com",
            "message": "Interested in the compliance training package.",
            "consent": true
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["status"], 500);
    assert!(body["retry"].is_null());
}
