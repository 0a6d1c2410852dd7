//! Chromium session lifecycle.
//!
//! One browser, one page, for the whole run. The launch is headful by
//! default — the listing site serves complete markup to an
//! interactive-looking browser and a visible window makes stalls obvious.
//! Whoever launches a session must call [`BrowserSession::close`]; the run
//! orchestrator guarantees this on every terminal path.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use st11_core::AppConfig;

use crate::error::ScraperError;

/// Interval between selector polls while waiting for content.
const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A launched browser, its CDP event pump, and the single page the crawl
/// drives.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: Page,
}

impl BrowserSession {
    /// Launches the browser and opens a blank page with the configured
    /// viewport and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Launch`] if the browser configuration is
    /// rejected, or [`ScraperError::Cdp`] if the process fails to start or
    /// the page cannot be prepared. The browser process is torn down if
    /// page preparation fails.
    pub async fn launch(config: &AppConfig) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.viewport_width, config.viewport_height)
            .no_sandbox();
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder.build().map_err(ScraperError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(browser_config).await?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        // If the page cannot be prepared the browser process must still be
        // torn down here; the caller never sees a half-built session.
        match Self::prepare_page(&browser, config).await {
            Ok(page) => Ok(Self {
                browser,
                handler_task,
                page,
            }),
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    tracing::debug!(error = %close_err, "browser close after failed page prep");
                }
                let _ = browser.wait().await;
                handler_task.abort();
                Err(e)
            }
        }
    }

    async fn prepare_page(browser: &Browser, config: &AppConfig) -> Result<Page, ScraperError> {
        let page = browser.new_page("about:blank").await?;
        page.execute(SetUserAgentOverrideParams::new(
            config.user_agent.clone(),
        ))
        .await?;
        Ok(page)
    }

    /// Returns the page the crawl drives.
    #[must_use]
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Navigates the page to `url`, bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Navigation`] on a protocol error or when
    /// the navigation does not complete in time.
    pub async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), ScraperError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ScraperError::Navigation {
                url: url.to_owned(),
                reason: e.to_string(),
            }),
            Err(_) => Err(ScraperError::Navigation {
                url: url.to_owned(),
                reason: format!("timed out after {}s", timeout.as_secs()),
            }),
        }
    }

    /// Polls for `selector` until it appears or `timeout` elapses.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::SelectorTimeout`] when the deadline passes
    /// without a match.
    pub async fn wait_for_selector(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), ScraperError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.page.find_element(selector).await.is_ok() {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ScraperError::SelectorTimeout {
                    selector: selector.to_owned(),
                    waited_secs: timeout.as_secs(),
                });
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    /// Best-effort shutdown: close the browser, wait for the process to
    /// exit, stop the event pump. Never fails — there is nothing useful a
    /// caller could do with a close error beyond the log line.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::debug!(error = %e, "browser close returned an error");
        }
        if let Err(e) = self.browser.wait().await {
            tracing::debug!(error = %e, "browser wait returned an error");
        }
        self.handler_task.abort();
    }
}
