//! Async client for the careers CMS.
//!
//! Wraps the REST endpoints for job posts, blog posts and contact
//! submissions. Every call is a single request: no retries, no caching.
//! A non-2xx answer becomes [`CmsError::Status`]; an empty page is a normal
//! result.

mod config;
mod error;
mod session;

pub use config::{CmsArgs, CmsConfig, DEFAULT_CMS_URL};
pub use error::CmsError;
pub use session::{Outcome, SearchSession, Ticket};

use std::collections::HashSet;

use careers_common::{
    BlogPost, CmsQuery, ContactSubmission, JobPost, JobSearchParams, Operator, Paginated,
    PostListParams,
};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use url::Url;

/// Page size used when walking the whole job collection.
const EXPORT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct CmsClient {
    http: Client,
    base_url: Url,
}

impl CmsClient {
    pub fn new(config: CmsConfig) -> Result<Self, CmsError> {
        let http = Client::builder()
            .user_agent(config.user_agent)
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/{segments...}`, keeping any path prefix on the base URL.
    fn api_url(&self, segments: &[&str]) -> Result<Url, CmsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CmsError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("api")
            .extend(segments);
        Ok(url)
    }

    fn collection_url(&self, collection: &str, query: &CmsQuery) -> Result<Url, CmsError> {
        let mut url = self.api_url(&[collection])?;
        url.query_pairs_mut().extend_pairs(query.to_pairs());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CmsError> {
        debug!(%url, "cms request");
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "cms request failed");
            return Err(CmsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| CmsError::Decode {
            url: url.to_string(),
            source,
        })
    }

    /// Runs a filtered job search. Only active postings are returned.
    pub async fn search_jobs(
        &self,
        params: &JobSearchParams,
    ) -> Result<Paginated<JobPost>, CmsError> {
        let url = self.collection_url("jobposts", &params.to_cms_query())?;
        let page: Paginated<JobPost> = self.get_json(url).await?;
        info!(
            total = page.total_docs,
            page = page.page,
            pages = page.total_pages,
            "job search"
        );
        Ok(page)
    }

    /// Fetches one job post with its company expanded. Drafts and closed
    /// postings are reported as missing.
    pub async fn job(&self, id: &str) -> Result<JobPost, CmsError> {
        let mut url = self.api_url(&["jobposts", id])?;
        url.query_pairs_mut().append_pair("depth", "1");
        let job: JobPost = self.get_json(url).await?;
        if !job.is_active() {
            return Err(CmsError::NotFound(format!("job {id}")));
        }
        Ok(job)
    }

    /// Walks every page of active jobs, dropping duplicates that shift
    /// between pages while we read.
    pub async fn all_active_jobs(&self) -> Result<Vec<JobPost>, CmsError> {
        let mut params = JobSearchParams {
            limit: EXPORT_PAGE_SIZE,
            ..JobSearchParams::default()
        };
        let mut jobs = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut last_page = 0;

        loop {
            let page = self.search_jobs(&params).await?;
            // A CMS that ignores `page` echoes the same page forever.
            if page.page <= last_page {
                warn!(requested = params.page, got = page.page, "CMS did not advance, stopping export");
                break;
            }
            last_page = page.page;
            let more = page.has_next_page && page.page < page.total_pages;
            for job in page.docs {
                if seen_ids.insert(job.id.clone()) {
                    jobs.push(job);
                }
            }
            if !more {
                break;
            }
            params = params.with_page(last_page.saturating_add(1));
        }
        Ok(jobs)
    }

    pub async fn list_posts(
        &self,
        params: &PostListParams,
    ) -> Result<Paginated<BlogPost>, CmsError> {
        let url = self.collection_url("posts", &params.to_cms_query())?;
        self.get_json(url).await
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<BlogPost, CmsError> {
        let query = CmsQuery::new()
            .filter("slug", Operator::Equals, slug)
            .filter("_status", Operator::Equals, "published")
            .limit(1);
        let url = self.collection_url("posts", &query)?;
        let page: Paginated<BlogPost> = self.get_json(url).await?;
        page.docs
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::NotFound(format!("post {slug}")))
    }

    /// Validates the form locally, then stores it in the CMS.
    pub async fn submit_contact(&self, submission: &ContactSubmission) -> Result<(), CmsError> {
        submission.validate()?;

        let url = self.api_url(&["contact-submissions"])?;
        let response = self.http.post(url.clone()).json(submission).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "contact submission rejected");
            return Err(CmsError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        info!("contact submission stored");
        Ok(())
    }
}
