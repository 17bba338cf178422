//! Task page retrieval: direct HTTP GET with a rendered-page fallback for
//! JavaScript-driven pages.

use std::time::Duration;

use async_trait::async_trait;

use super::error::FetchError;
use super::render::RenderSession;

/// Timeout for the direct (non-rendered) fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = "Mozilla/5.0 (compatible; quizsolver/0.3)";

/// One task page, produced once per attempt and discarded after it.
#[derive(Debug, Clone)]
pub struct TaskPage {
    pub url: String,
    pub raw_content: String,
    pub fetched_via_fallback: bool,
}

/// Retrieves task page content. `release` frees any rendering resource the
/// fetcher holds and is called exactly once at session end.
#[async_trait]
pub trait TaskFetcher: Send + Sync {
    async fn fetch(&mut self, url: &str) -> Result<TaskPage, FetchError>;

    /// Release any held rendering resource. Default: nothing to release.
    async fn release(&mut self) {}
}

/// Production fetcher: reqwest GET first, chromiumoxide rendered fetch on
/// any network-level failure. The render session is created at most once and
/// reused across attempts within the session.
pub struct ContentFetcher {
    client: reqwest::Client,
    cdp_url: String,
    render: Option<RenderSession>,
}

impl ContentFetcher {
    pub fn new(cdp_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            cdp_url: cdp_url.into(),
            render: None,
        })
    }

    /// Direct GET; any connection error, timeout, or non-2xx status is a
    /// failure that triggers the rendered fallback.
    async fn fetch_direct(&self, url: &str) -> Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        response.text().await.map_err(|e| e.to_string())
    }

    /// Rendered fetch, lazily connecting the browser session on first use.
    async fn fetch_rendered(&mut self, url: &str) -> anyhow::Result<String> {
        let session = match self.render.take() {
            Some(session) => session,
            None => RenderSession::connect(&self.cdp_url).await?,
        };
        let result = session.fetch_text(url).await;
        // Keep the session for reuse across attempts; released at session end.
        self.render = Some(session);
        result
    }
}

#[async_trait]
impl TaskFetcher for ContentFetcher {
    async fn fetch(&mut self, url: &str) -> Result<TaskPage, FetchError> {
        match self.fetch_direct(url).await {
            Ok(content) => Ok(TaskPage {
                url: url.to_string(),
                raw_content: content,
                fetched_via_fallback: false,
            }),
            Err(direct) => {
                tracing::warn!(
                    "Direct fetch of {} failed ({}), falling back to rendered fetch",
                    url,
                    direct
                );
                match self.fetch_rendered(url).await {
                    Ok(content) => Ok(TaskPage {
                        url: url.to_string(),
                        raw_content: content,
                        fetched_via_fallback: true,
                    }),
                    Err(fallback) => Err(FetchError {
                        url: url.to_string(),
                        direct,
                        fallback: fallback.to_string(),
                    }),
                }
            }
        }
    }

    async fn release(&mut self) {
        if let Some(session) = self.render.take() {
            session.close().await;
            tracing::debug!("Render session released");
        }
    }
}
