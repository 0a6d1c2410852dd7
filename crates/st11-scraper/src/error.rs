use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("browser protocol error: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("no product card appeared for \"{selector}\" within {waited_secs}s")]
    SelectorTimeout { selector: String, waited_secs: u64 },

    #[error("page snapshot did not deserialize: {0}")]
    Snapshot(#[source] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
