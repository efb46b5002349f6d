//! Documents returned by the CMS REST API.
//!
//! These mirror the CMS collections (`jobposts`, `companies`, `posts`) and the
//! list envelope it wraps them in. The CMS owns the data; we only hold a copy
//! for the length of one request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Ids are strings on a Mongo-backed CMS and integers on Postgres.
fn de_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(id) => id,
        RawId::Number(id) => id.to_string(),
    })
}

/// Benefits come either as plain strings or as array-field rows
/// (`[{ "benefit": "..." }]`). Both collapse into a list of strings.
fn de_benefits<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawBenefit {
        Text(String),
        Row { benefit: String },
    }

    let rows: Option<Vec<RawBenefit>> = Option::deserialize(deserializer)?;
    Ok(rows
        .unwrap_or_default()
        .into_iter()
        .map(|row| match row {
            RawBenefit::Text(text) => text,
            RawBenefit::Row { benefit } => benefit,
        })
        .filter(|b| !b.trim().is_empty())
        .collect())
}

/// A relationship field: a bare id at `depth=0`, the full document once the
/// CMS expands it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Populated(T),
    Id(#[serde(deserialize_with = "de_id")] String),
}

impl<T> Relation<T> {
    pub fn doc(&self) -> Option<&T> {
        match self {
            Relation::Populated(doc) => Some(doc),
            Relation::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    /// Anything the CMS (or a hand-edited URL) sends that we don't know.
    /// Kept verbatim so it reaches the API unchanged.
    Other(String),
}

impl EmploymentType {
    pub fn as_str(&self) -> &str {
        match self {
            EmploymentType::FullTime => "full-time",
            EmploymentType::PartTime => "part-time",
            EmploymentType::Contract => "contract",
            EmploymentType::Internship => "internship",
            EmploymentType::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EmploymentType::FullTime => "Full-time",
            EmploymentType::PartTime => "Part-time",
            EmploymentType::Contract => "Contract",
            EmploymentType::Internship => "Internship",
            EmploymentType::Other(raw) => raw,
        }
    }
}

impl From<&str> for EmploymentType {
    fn from(raw: &str) -> Self {
        match raw {
            "full-time" => EmploymentType::FullTime,
            "part-time" => EmploymentType::PartTime,
            "contract" => EmploymentType::Contract,
            "internship" => EmploymentType::Internship,
            other => EmploymentType::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EmploymentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EmploymentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(EmploymentType::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JobStatus {
    Draft,
    Active,
    Closed,
    #[default]
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Draft => "DRAFT",
            JobStatus::Active => "ACTIVE",
            JobStatus::Closed => "CLOSED",
            JobStatus::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub url: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub website: Option<String>,
    pub logo: Option<Relation<Media>>,
    pub about: Option<String>,
}

impl Company {
    pub fn logo_url(&self) -> Option<&str> {
        self.logo.as_ref()?.doc()?.url.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPost {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    pub employment_type: Option<EmploymentType>,
    pub location: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    /// Rich-text tree as authored in the CMS editor.
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "de_benefits")]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub status: JobStatus,
    pub company: Option<Relation<Company>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl JobPost {
    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Active
    }

    pub fn company(&self) -> Option<&Company> {
        self.company.as_ref()?.doc()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.company().map(|c| c.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Draft,
    #[default]
    Published,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: Option<Value>,
    pub published_at: Option<DateTime<Utc>>,
    #[serde(rename = "_status", default)]
    pub status: PublishStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// List envelope used by every CMS collection endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u32,
    #[serde(default = "first_page")]
    pub page: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    #[serde(default)]
    pub next_page: Option<u32>,
    #[serde(default)]
    pub prev_page: Option<u32>,
}

fn first_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    /// Zero matches is a normal result, not a failure.
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            docs: self.docs.into_iter().map(f).collect(),
            total_docs: self.total_docs,
            limit: self.limit,
            page: self.page,
            total_pages: self.total_pages,
            has_next_page: self.has_next_page,
            has_prev_page: self.has_prev_page,
            next_page: self.next_page,
            prev_page: self.prev_page,
        }
    }
}
