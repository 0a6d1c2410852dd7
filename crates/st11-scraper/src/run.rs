//! The crawl run: one sequential pass from browser launch to the final
//! product list.
//!
//! Phase order is `Initializing → Navigating → WaitingForContent →
//! Scrolling → Extracting → Downloading → Completed`. The cancellation
//! token is observed cooperatively at phase boundaries (and inside the
//! scroll and download loops between items); an in-flight browser
//! operation always completes before cancellation takes effect.
//!
//! The browser is released on every exit from the state machine —
//! completion, cancellation, or failure.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use st11_core::{capture_date, AppConfig, Product};

use crate::error::ScraperError;
use crate::events::{CrawlPhase, EventSender};
use crate::extract::{collect_snapshots, product_from_snapshot, CARD_ANCHOR_SELECTOR};
use crate::images::ImageFetcher;
use crate::scroll::{scroll_until_stable, ScrollSettings};
use crate::session::BrowserSession;

/// What a finished run produced.
///
/// `phase` is either [`CrawlPhase::Completed`] or [`CrawlPhase::Cancelled`];
/// failures are reported through the `Err` arm of [`run_crawl`] instead.
/// On cancellation `products` holds whatever was gathered before the token
/// was observed — possibly nothing, never an error.
#[derive(Debug)]
pub struct CrawlOutcome {
    pub phase: CrawlPhase,
    pub products: Vec<Product>,
}

impl CrawlOutcome {
    fn cancelled(products: Vec<Product>) -> Self {
        Self {
            phase: CrawlPhase::Cancelled,
            products,
        }
    }

    /// Returns `true` if the run was stopped by the operator.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.phase == CrawlPhase::Cancelled
    }
}

/// Runs one full crawl of `url`.
///
/// Emits [`CrawlEvent`](crate::events::CrawlEvent)s for every phase change
/// and progress step. A token cancelled before the first phase yields an
/// empty `Cancelled` outcome without ever launching a browser.
///
/// # Errors
///
/// Fatal errors — browser launch, navigation, the content wait, or a
/// protocol failure mid-run — abort the run (`Failed` in state-machine
/// terms). Per-item extraction cannot fail and per-item download failures
/// are contained by the fetcher, so neither ever escalates here.
pub async fn run_crawl(
    config: &AppConfig,
    url: &str,
    cancel: &CancellationToken,
    events: &EventSender,
) -> Result<CrawlOutcome, ScraperError> {
    if cancel.is_cancelled() {
        events.phase(CrawlPhase::Cancelled);
        return Ok(CrawlOutcome::cancelled(Vec::new()));
    }

    events.phase(CrawlPhase::Initializing);
    events.log("launching browser...");
    let session = BrowserSession::launch(config).await?;

    // From here on the browser must be released whatever happens inside.
    let result = drive(&session, config, url, cancel, events).await;
    session.close().await;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) => {
            events.phase(CrawlPhase::Failed);
            return Err(e);
        }
    };
    events.phase(outcome.phase);
    if outcome.phase == CrawlPhase::Completed {
        events.log(format!("crawl complete: {} products", outcome.products.len()));
    } else {
        events.log(format!(
            "crawl cancelled with {} partial products",
            outcome.products.len()
        ));
    }
    events.products(outcome.products.clone());
    Ok(outcome)
}

/// Everything between launch and release. Split out so [`run_crawl`] can
/// close the session on the single exit path above.
async fn drive(
    session: &BrowserSession,
    config: &AppConfig,
    url: &str,
    cancel: &CancellationToken,
    events: &EventSender,
) -> Result<CrawlOutcome, ScraperError> {
    if cancel.is_cancelled() {
        return Ok(CrawlOutcome::cancelled(Vec::new()));
    }

    events.phase(CrawlPhase::Navigating);
    events.log(format!("loading page: {url}"));
    session.navigate(url, config.nav_timeout()).await?;

    if cancel.is_cancelled() {
        return Ok(CrawlOutcome::cancelled(Vec::new()));
    }

    events.phase(CrawlPhase::WaitingForContent);
    events.log("waiting for product cards...");
    session
        .wait_for_selector(CARD_ANCHOR_SELECTOR, config.selector_timeout())
        .await?;
    // Let the first screen of cards finish rendering before scrolling.
    tokio::time::sleep(Duration::from_secs(config.settle_delay_secs)).await;

    if cancel.is_cancelled() {
        return Ok(CrawlOutcome::cancelled(Vec::new()));
    }

    events.phase(CrawlPhase::Scrolling);
    events.log("scrolling page (loading images)...");
    let settings = ScrollSettings::new(
        config.scroll_step_px,
        config.scroll_pause(),
        config.scroll_max_rounds,
    );
    scroll_until_stable(session.page(), settings, cancel, events).await?;

    if cancel.is_cancelled() {
        return Ok(CrawlOutcome::cancelled(Vec::new()));
    }

    events.phase(CrawlPhase::Extracting);
    events.log("collecting product details...");
    let snapshots = collect_snapshots(session.page()).await?;
    events.log(format!("found {} products", snapshots.len()));

    let captured_on = capture_date();
    let total = snapshots.len();
    let mut products: Vec<Product> = Vec::with_capacity(total);
    for (idx, snapshot) in snapshots.iter().enumerate() {
        let product = product_from_snapshot(snapshot, &captured_on);
        events.log(format!(
            "product {}/{} processed: {}",
            idx + 1,
            total,
            truncate_chars(&product.name, 30)
        ));
        products.push(product);
    }

    if cancel.is_cancelled() {
        return Ok(CrawlOutcome::cancelled(products));
    }

    if !products.is_empty() {
        events.phase(CrawlPhase::Downloading);
        let fetcher = ImageFetcher::new(config.image_timeout_secs, &config.user_agent)?;
        fetcher
            .download_thumbnails(&mut products, &config.image_dir, cancel, events)
            .await?;
    }

    if cancel.is_cancelled() {
        return Ok(CrawlOutcome::cancelled(products));
    }

    Ok(CrawlOutcome {
        phase: CrawlPhase::Completed,
        products,
    })
}

/// Log-line truncation that respects char boundaries (names are Hangul).
fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
