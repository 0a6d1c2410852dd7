use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration for a crawl run.
///
/// Every knob has a default matching the behavior the crawler was tuned
/// against (11st.co.kr category pages); overrides come from `ST11_*`
/// environment variables via [`crate::config::load_app_config`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Run the browser without a visible window. Defaults to `false`:
    /// the listing site serves its full markup to an interactive-looking
    /// browser, and a visible window makes a stalled run obvious.
    pub headless: bool,
    /// Browser viewport width in pixels.
    pub viewport_width: u32,
    /// Browser viewport height in pixels.
    pub viewport_height: u32,
    /// `User-Agent` used both for the browser session and image downloads.
    pub user_agent: String,
    /// Timeout for the initial category-page navigation.
    pub nav_timeout_secs: u64,
    /// Timeout waiting for the first product card to appear.
    pub selector_timeout_secs: u64,
    /// Settle delay after the first card appears, before scrolling starts.
    pub settle_delay_secs: u64,
    /// Pixels advanced per scroll round.
    pub scroll_step_px: u32,
    /// Pause between scroll rounds, letting lazy content materialize.
    pub scroll_pause_ms: u64,
    /// Hard cap on scroll rounds. Liveness bound for pages whose height
    /// keeps growing.
    pub scroll_max_rounds: u32,
    /// Per-image download timeout.
    pub image_timeout_secs: u64,
    /// Directory thumbnail files are written into.
    pub image_dir: PathBuf,
    /// Default log level filter for the CLI subscriber.
    pub log_level: String,
}

impl AppConfig {
    /// Pause between scroll rounds as a [`Duration`].
    #[must_use]
    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }

    /// Navigation timeout as a [`Duration`].
    #[must_use]
    pub fn nav_timeout(&self) -> Duration {
        Duration::from_secs(self.nav_timeout_secs)
    }

    /// Selector-wait timeout as a [`Duration`].
    #[must_use]
    pub fn selector_timeout(&self) -> Duration {
        Duration::from_secs(self.selector_timeout_secs)
    }
}
