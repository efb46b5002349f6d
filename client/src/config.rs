use std::time::Duration;

use clap::Args;
use url::Url;

use crate::error::CmsError;

pub const DEFAULT_CMS_URL: &str = "http://localhost:3000";

/// Connection settings for the CMS.
#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub user_agent: String,
}

impl CmsConfig {
    pub fn new(base_url: &str) -> Result<Self, CmsError> {
        let base_url =
            Url::parse(base_url).map_err(|e| CmsError::BaseUrl(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") || base_url.cannot_be_a_base() {
            return Err(CmsError::BaseUrl(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            timeout: Duration::from_secs(10),
            user_agent: concat!("careers/", env!("CARGO_PKG_VERSION")).to_string(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// CMS flags shared by the CLI and the server.
#[derive(Args, Debug, Clone)]
pub struct CmsArgs {
    /// Base URL of the CMS, e.g. https://cms.example.com
    #[arg(long, env = "CMS_URL", default_value = DEFAULT_CMS_URL)]
    pub cms_url: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "CMS_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,
}

impl CmsArgs {
    pub fn to_config(&self) -> Result<CmsConfig, CmsError> {
        Ok(CmsConfig::new(&self.cms_url)?.with_timeout(Duration::from_secs(self.timeout_secs)))
    }
}
