//! Job filter state and its URL query-string codec.
//!
//! The filter panel never keeps state of its own: the URL is the state.
//! Every change produces a new query string, and every page load decodes one.
//! Values are not range-checked here, the CMS decides what is valid.

use serde::{Serialize, Serializer};
use url::form_urlencoded;

use crate::cms_query::{CmsQuery, Operator};
use crate::model::EmploymentType;

pub const DEFAULT_JOB_LIMIT: u32 = 10;
pub const DEFAULT_POST_LIMIT: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SortKey {
    Newest,
    Oldest,
    SalaryHigh,
    SalaryLow,
    Title,
    /// Raw sort token, forwarded as-is.
    Other(String),
}

impl SortKey {
    /// Value used in the browser URL.
    pub fn as_param(&self) -> &str {
        match self {
            SortKey::Newest => "newest",
            SortKey::Oldest => "oldest",
            SortKey::SalaryHigh => "salary-desc",
            SortKey::SalaryLow => "salary-asc",
            SortKey::Title => "title",
            SortKey::Other(raw) => raw,
        }
    }

    /// Value sent to the CMS `sort` parameter.
    pub fn cms_token(&self) -> &str {
        match self {
            SortKey::Newest => "-createdAt",
            SortKey::Oldest => "createdAt",
            SortKey::SalaryHigh => "-salaryMax",
            SortKey::SalaryLow => "salaryMin",
            SortKey::Title => "title",
            SortKey::Other(raw) => raw,
        }
    }

    pub fn from_param(raw: &str) -> Self {
        match raw {
            "newest" => SortKey::Newest,
            "oldest" => SortKey::Oldest,
            "salary-desc" => SortKey::SalaryHigh,
            "salary-asc" => SortKey::SalaryLow,
            "title" => SortKey::Title,
            other => SortKey::Other(other.to_string()),
        }
    }
}

impl Serialize for SortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_param())
    }
}

/// URL keys understood by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKey {
    Keyword,
    EmploymentType,
    Location,
    MinSalary,
    MaxSalary,
    Sort,
    Page,
    Limit,
}

impl FilterKey {
    pub fn name(self) -> &'static str {
        match self {
            FilterKey::Keyword => "q",
            FilterKey::EmploymentType => "employmentType",
            FilterKey::Location => "location",
            FilterKey::MinSalary => "minSalary",
            FilterKey::MaxSalary => "maxSalary",
            FilterKey::Sort => "sort",
            FilterKey::Page => "page",
            FilterKey::Limit => "limit",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "q" => FilterKey::Keyword,
            "employmentType" => FilterKey::EmploymentType,
            "location" => FilterKey::Location,
            "minSalary" => FilterKey::MinSalary,
            "maxSalary" => FilterKey::MaxSalary,
            "sort" => FilterKey::Sort,
            "page" => FilterKey::Page,
            "limit" => FilterKey::Limit,
            _ => return None,
        })
    }
}

/// Filter state for one job-search navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchParams {
    pub q: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub location: Option<String>,
    pub min_salary: Option<String>,
    pub max_salary: Option<String>,
    pub sort: Option<SortKey>,
    pub page: u32,
    pub limit: u32,
}

impl Default for JobSearchParams {
    fn default() -> Self {
        Self {
            q: None,
            employment_type: None,
            location: None,
            min_salary: None,
            max_salary: None,
            sort: None,
            page: 1,
            limit: DEFAULT_JOB_LIMIT,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn positive_or(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(default)
}

impl JobSearchParams {
    /// Decodes a browser query string. A leading `?` is accepted.
    pub fn from_query_string(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        form_urlencoded::parse(raw.as_bytes()).fold(Self::default(), |mut params, (key, value)| {
            if let Some(key) = FilterKey::from_name(&key) {
                params.set(key, Some(value.into_owned()));
            }
            params
        })
    }

    /// Encodes into a query string without the leading `?`. Defaults are
    /// left out so the canonical URL of an unfiltered search is empty.
    pub fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(q) = &self.q {
            out.append_pair(FilterKey::Keyword.name(), q);
        }
        if let Some(kind) = &self.employment_type {
            out.append_pair(FilterKey::EmploymentType.name(), kind.as_str());
        }
        if let Some(location) = &self.location {
            out.append_pair(FilterKey::Location.name(), location);
        }
        if let Some(min) = &self.min_salary {
            out.append_pair(FilterKey::MinSalary.name(), min);
        }
        if let Some(max) = &self.max_salary {
            out.append_pair(FilterKey::MaxSalary.name(), max);
        }
        if let Some(sort) = &self.sort {
            out.append_pair(FilterKey::Sort.name(), sort.as_param());
        }
        if self.page != 1 {
            out.append_pair(FilterKey::Page.name(), &self.page.to_string());
        }
        if self.limit != DEFAULT_JOB_LIMIT {
            out.append_pair(FilterKey::Limit.name(), &self.limit.to_string());
        }
        out.finish()
    }

    /// Returns the params with one filter changed. Any change other than the
    /// page number sends the user back to page 1.
    pub fn with_filter(&self, key: FilterKey, value: Option<String>) -> Self {
        let mut next = self.clone();
        next.set(key, value);
        if key != FilterKey::Page {
            next.page = 1;
        }
        next
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    /// True when no filter beyond paging is set.
    pub fn is_unfiltered(&self) -> bool {
        self.q.is_none()
            && self.employment_type.is_none()
            && self.location.is_none()
            && self.min_salary.is_none()
            && self.max_salary.is_none()
    }

    fn set(&mut self, key: FilterKey, value: Option<String>) {
        let value = non_empty(value);
        match key {
            FilterKey::Keyword => self.q = value,
            FilterKey::EmploymentType => {
                self.employment_type = value.as_deref().map(EmploymentType::from)
            }
            FilterKey::Location => self.location = value,
            FilterKey::MinSalary => self.min_salary = value,
            FilterKey::MaxSalary => self.max_salary = value,
            FilterKey::Sort => self.sort = value.as_deref().map(SortKey::from_param),
            FilterKey::Page => self.page = positive_or(value.as_deref(), 1),
            FilterKey::Limit => self.limit = positive_or(value.as_deref(), DEFAULT_JOB_LIMIT),
        }
    }

    /// Translates filter state into the CMS query. Only active postings are
    /// ever listed, and the company relation is expanded one level.
    pub fn to_cms_query(&self) -> CmsQuery {
        let mut query = CmsQuery::new()
            .filter("status", Operator::Equals, "ACTIVE")
            .page(self.page)
            .limit(self.limit)
            .depth(1)
            .sort(
                self.sort
                    .as_ref()
                    .unwrap_or(&SortKey::Newest)
                    .cms_token(),
            );

        if let Some(kind) = &self.employment_type {
            query = query.filter("employmentType", Operator::Equals, kind.as_str());
        }
        if let Some(location) = &self.location {
            query = query.filter("location", Operator::Contains, location);
        }
        if let Some(min) = &self.min_salary {
            query = query.filter("salaryMin", Operator::GreaterThanEqual, min);
        }
        if let Some(max) = &self.max_salary {
            query = query.filter("salaryMax", Operator::LessThanEqual, max);
        }
        if let Some(q) = &self.q {
            query = query
                .any_of("title", Operator::Contains, q)
                .any_of("description", Operator::Contains, q);
        }
        query
    }
}

/// Paging state for the blog listing. Only `page` travels in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PostListParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for PostListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_POST_LIMIT,
        }
    }
}

impl PostListParams {
    pub fn from_query_string(raw: &str) -> Self {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let page = form_urlencoded::parse(raw.as_bytes())
            .filter(|(key, _)| key == "page")
            .last()
            .map(|(_, value)| positive_or(Some(&*value), 1))
            .unwrap_or(1);
        Self {
            page,
            ..Self::default()
        }
    }

    pub fn to_query_string(&self) -> String {
        if self.page == 1 {
            String::new()
        } else {
            format!("page={}", self.page)
        }
    }

    pub fn to_cms_query(&self) -> CmsQuery {
        CmsQuery::new()
            .filter("_status", Operator::Equals, "published")
            .page(self.page)
            .limit(self.limit)
            .sort("-publishedAt")
    }
}
