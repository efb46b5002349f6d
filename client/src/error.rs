use careers_common::ValidationErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    #[error("invalid CMS base url: {0}")]
    BaseUrl(String),

    #[error("CMS responded with HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("request to CMS failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
}

impl CmsError {
    /// HTTP status to show the user next to the retry button, if the CMS
    /// answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            CmsError::Status { status, .. } => Some(*status),
            CmsError::NotFound(_) => Some(404),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
