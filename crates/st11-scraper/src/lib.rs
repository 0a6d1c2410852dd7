pub mod error;
pub mod events;
pub mod extract;
pub mod images;
pub mod normalize;
pub mod run;
pub mod scroll;
pub mod session;

pub use error::ScraperError;
pub use events::{CrawlEvent, CrawlPhase, EventSender};
pub use extract::{product_from_snapshot, AnchorSnapshot, CARD_ANCHOR_SELECTOR};
pub use images::ImageFetcher;
pub use normalize::normalize_thumbnail_url;
pub use run::{run_crawl, CrawlOutcome};
