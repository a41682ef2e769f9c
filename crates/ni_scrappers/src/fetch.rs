use std::sync::Arc;
use std::time::Duration;

use ni_core::{ArticleUrl, Error, Result};
use reqwest::{redirect::Policy, Client};
use tracing::debug;

pub const DEFAULT_USER_AGENT: &str = concat!("news-impact/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout: Duration,
    pub user_agent: String,
    pub max_redirects: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 8,
        }
    }
}

/// Downloads article pages. Cheap to clone, the connection pool is shared.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Arc<Client>,
}

impl PageFetcher {
    pub fn new(settings: &FetchSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .redirect(Policy::limited(settings.max_redirects))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client: Arc::new(client) })
    }

    pub async fn fetch_html(&self, url: &ArticleUrl) -> Result<String> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url.as_url().clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Extraction(format!("failed to fetch {}: {}", url, e)))?;

        let html = response
            .text()
            .await
            .map_err(|e| Error::Extraction(format!("failed to read body of {}: {}", url, e)))?;
        debug!("Fetched {} bytes from {}", html.len(), url);
        Ok(html)
    }
}
