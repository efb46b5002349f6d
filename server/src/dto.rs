//! Response bodies. These are the props the page templates consume.

use careers_common::richtext::{excerpt, format_salary, plain_text};
use careers_common::{BlogPost, JobPost, JobSearchParams, PageItem, Paginated, page_window};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;

const CARD_EXCERPT_CHARS: usize = 160;

static SITE_ROOT: LazyLock<Url> = LazyLock::new(|| Url::parse("http://site.invalid/").unwrap());

/// Site-relative path with every segment percent-encoded.
fn site_path(segments: &[&str]) -> String {
    let mut url = SITE_ROOT.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

pub fn job_href(id: &str) -> String {
    site_path(&["careers", id])
}

pub fn post_href(slug: &str) -> String {
    site_path(&["blog", slug])
}

/// Canonical listing URL for a set of filters.
pub fn careers_href(params: &JobSearchParams) -> String {
    let query = params.to_query_string();
    if query.is_empty() {
        "/careers".to_string()
    } else {
        format!("/careers?{query}")
    }
}

pub fn blog_href(page: u32) -> String {
    if page <= 1 {
        "/blog".to_string()
    } else {
        format!("/blog?page={page}")
    }
}

/// Summary of a job for the result list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub id: String,
    pub title: String,
    pub company: Option<String>,
    pub company_logo: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub excerpt: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub href: String,
}

impl From<&JobPost> for JobCard {
    fn from(job: &JobPost) -> Self {
        let text = job.description.as_ref().map(plain_text).unwrap_or_default();
        Self {
            id: job.id.clone(),
            title: job.title.clone(),
            company: job.company_name().map(str::to_string),
            company_logo: job.company().and_then(|c| c.logo_url()).map(str::to_string),
            location: job.location.clone(),
            employment_type: job.employment_type.as_ref().map(|k| k.label().to_string()),
            salary: format_salary(job.salary_min, job.salary_max),
            excerpt: excerpt(&text, CARD_EXCERPT_CHARS),
            posted_at: job.created_at,
            href: job_href(&job.id),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(flatten)]
    pub card: JobCard,
    pub description: String,
    pub benefits: Vec<String>,
    pub company_website: Option<String>,
    pub company_about: Option<String>,
}

impl From<&JobPost> for JobDetail {
    fn from(job: &JobPost) -> Self {
        let company = job.company();
        Self {
            card: JobCard::from(job),
            description: job.description.as_ref().map(plain_text).unwrap_or_default(),
            benefits: job.benefits.clone(),
            company_website: company.and_then(|c| c.website.clone()),
            company_about: company.and_then(|c| c.about.clone()),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum PageLink {
    Page {
        page: u32,
        href: String,
        current: bool,
    },
    Ellipsis {
        ellipsis: bool,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub total_pages: u32,
    pub total_docs: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub prev: Option<String>,
    pub next: Option<String>,
    pub window: Vec<PageLink>,
}

impl Pagination {
    pub fn new<T>(results: &Paginated<T>, href: impl Fn(u32) -> String) -> Self {
        let window = page_window(results.page, results.total_pages)
            .into_iter()
            .map(|item| match item {
                PageItem::Page(page) => PageLink::Page {
                    page,
                    href: href(page),
                    current: page == results.page,
                },
                PageItem::Ellipsis => PageLink::Ellipsis { ellipsis: true },
            })
            .collect();

        Self {
            page: results.page,
            total_pages: results.total_pages,
            total_docs: results.total_docs,
            has_next_page: results.has_next_page,
            has_prev_page: results.has_prev_page,
            prev: results
                .has_prev_page
                .then(|| href(results.page.saturating_sub(1).max(1))),
            next: results
                .has_next_page
                .then(|| href(results.page.saturating_add(1))),
            window,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub params: JobSearchParams,
    pub query: String,
    pub jobs: Vec<JobCard>,
    /// Zero matches. Distinct from an upstream failure, which never gets here.
    pub empty: bool,
    pub pagination: Pagination,
}

impl SearchResponse {
    pub fn new(params: JobSearchParams, results: &Paginated<JobPost>) -> Self {
        let pagination = Pagination::new(results, |page| careers_href(&params.with_page(page)));
        Self {
            query: params.to_query_string(),
            jobs: results.docs.iter().map(JobCard::from).collect(),
            empty: results.is_empty(),
            pagination,
            params,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCard {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub published_at: Option<DateTime<Utc>>,
    pub href: String,
}

impl From<&BlogPost> for PostCard {
    fn from(post: &BlogPost) -> Self {
        let summary = match (&post.excerpt, &post.content) {
            (Some(text), _) if !text.trim().is_empty() => text.clone(),
            (_, Some(content)) => plain_text(content),
            _ => String::new(),
        };
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: excerpt(&summary, CARD_EXCERPT_CHARS),
            published_at: post.published_at,
            href: post_href(&post.slug),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BlogListResponse {
    pub posts: Vec<PostCard>,
    pub empty: bool,
    pub pagination: Pagination,
}

impl BlogListResponse {
    pub fn new(results: &Paginated<BlogPost>) -> Self {
        Self {
            posts: results.docs.iter().map(PostCard::from).collect(),
            empty: results.is_empty(),
            pagination: Pagination::new(results, blog_href),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    pub title: String,
    pub slug: String,
    pub published_at: Option<DateTime<Utc>>,
    pub body: String,
}

impl From<&BlogPost> for PostDetail {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            published_at: post.published_at,
            body: post.content.as_ref().map(plain_text).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(page: u32, total_pages: u32) -> Paginated<JobPost> {
        Paginated {
            docs: vec![],
            total_docs: u64::from(total_pages) * 10,
            limit: 10,
            page,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
            next_page: None,
            prev_page: None,
        }
    }

    #[test]
    fn test_careers_href() {
        assert_eq!(careers_href(&JobSearchParams::default()), "/careers");
        let params = JobSearchParams::from_query_string("location=Remote&page=3");
        assert_eq!(careers_href(&params), "/careers?location=Remote&page=3");
    }

    #[test]
    fn test_page_links_keep_filters() {
        let params = JobSearchParams::from_query_string("q=rust&page=5");
        let response = SearchResponse::new(params, &results(5, 10));
        let pagination = &response.pagination;

        assert_eq!(pagination.prev.as_deref(), Some("/careers?q=rust&page=4"));
        assert_eq!(pagination.next.as_deref(), Some("/careers?q=rust&page=6"));
        assert_eq!(
            pagination.window[0],
            PageLink::Page {
                page: 1,
                href: "/careers?q=rust".to_string(),
                current: false,
            }
        );
        assert_eq!(pagination.window[1], PageLink::Ellipsis { ellipsis: true });
        assert!(pagination.window.contains(&PageLink::Page {
            page: 5,
            href: "/careers?q=rust&page=5".to_string(),
            current: true,
        }));
        assert_eq!(pagination.window.len(), 9);
        assert!(response.empty);
    }

    #[test]
    fn test_single_page_has_no_neighbours() {
        let response = SearchResponse::new(JobSearchParams::default(), &results(1, 1));
        assert_eq!(response.pagination.window.len(), 1);
        assert_eq!(response.pagination.prev, None);
        assert_eq!(response.pagination.next, None);
    }

    #[test]
    fn test_detail_links_encode_segments() {
        assert_eq!(job_href("42"), "/careers/42");
        assert_eq!(job_href("a b?c#d"), "/careers/a%20b%3Fc%23d");
        assert_eq!(post_href("rust/async"), "/blog/rust%2Fasync");
        assert_eq!(post_href("über"), "/blog/%C3%BCber");
    }

    #[test]
    fn test_last_representable_page_does_not_overflow() {
        let mut last = results(u32::MAX, u32::MAX);
        last.has_next_page = true;
        let pagination = Pagination::new(&last, blog_href);
        assert_eq!(pagination.next, Some(format!("/blog?page={}", u32::MAX)));
    }

    #[test]
    fn test_blog_href() {
        assert_eq!(blog_href(1), "/blog");
        assert_eq!(blog_href(2), "/blog?page=2");
    }
}
