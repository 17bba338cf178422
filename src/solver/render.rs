//! Rendered-page fetch via Chrome DevTools Protocol (CDP).
//!
//! Connects to a Chrome/Chromium browser running with remote debugging
//! enabled (`google-chrome --remote-debugging-port=9222`). A session is
//! created lazily on first fallback need, reused across attempts, and must
//! be released exactly once at session end via [`RenderSession::close`].

use std::time::Duration;

use chromiumoxide::browser::Browser;
use chromiumoxide::Page;
use futures::StreamExt;

/// Upper bound on waiting for the rendered DOM body.
const RENDER_WAIT: Duration = Duration::from_secs(10);

/// Poll interval for the body-readiness check.
const RENDER_POLL: Duration = Duration::from_millis(250);

/// A session-scoped handle to one browser page.
///
/// The CDP event handler runs in a background task for the lifetime of the
/// session; dropping the session aborts it, so an abrupt unwind still tears
/// the connection down.
pub struct RenderSession {
    #[allow(dead_code)]
    browser: Browser,
    page: Page,
    handler: tokio::task::JoinHandle<()>,
}

impl RenderSession {
    /// Connect to a Chrome instance at the given CDP endpoint and open a
    /// blank page.
    pub async fn connect(cdp_url: &str) -> anyhow::Result<Self> {
        let (browser, mut handler) = Browser::connect(cdp_url).await.map_err(|e| {
            anyhow::anyhow!(
                "Failed to connect to Chrome at {}. Make sure Chrome is running with --remote-debugging-port=9222. Error: {}",
                cdp_url,
                e
            )
        })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::warn!("Browser event error: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            page,
            handler: handle,
        })
    }

    /// Navigate to `url`, wait until the DOM body has rendered text (bounded
    /// by [`RENDER_WAIT`]), and return the body text.
    pub async fn fetch_text(&self, url: &str) -> anyhow::Result<String> {
        self.page.goto(url).await?;

        let deadline = tokio::time::Instant::now() + RENDER_WAIT;
        loop {
            let ready = self
                .page
                .evaluate("!!document.body && document.body.innerText.length > 0")
                .await
                .ok()
                .and_then(|r| r.into_value::<bool>().ok())
                .unwrap_or(false);
            if ready || tokio::time::Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(RENDER_POLL).await;
        }

        let result = self
            .page
            .evaluate("document.body ? document.body.innerText : ''")
            .await?;
        let text = result.into_value::<String>().unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("rendered page produced no text content");
        }
        Ok(text)
    }

    /// Release the session: close the page and stop the event handler.
    pub async fn close(self) {
        if let Err(e) = self.page.clone().close().await {
            tracing::warn!("Failed to close render page: {}", e);
        }
        // Drop aborts the handler task and the browser connection.
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}
