use serde::{Deserialize, Serialize};

/// Sentinel written into any product field that could not be resolved from
/// the listing markup. Fields are never empty and never absent — a consumer
/// can rely on every record carrying all of its string fields.
pub const SENTINEL: &str = "N/A";

/// One product discovered on the category listing page.
///
/// Records are created by the extraction step, one per discovered card
/// anchor, in DOM order. That order is preserved through display and export.
/// After creation a record is immutable except for the single
/// `thumbnail_local` enrichment performed when its thumbnail download
/// succeeds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product detail page link, as found in the anchor's `href`.
    pub url: String,
    /// Display name from the card's screen-reader text, or [`SENTINEL`].
    pub name: String,
    /// Price text, either from the visible price element or parsed out of
    /// the card's embedded JSON payload, or [`SENTINEL`].
    pub price: String,
    /// Remote thumbnail URL as found in the markup (possibly
    /// protocol-relative or root-relative), or [`SENTINEL`].
    pub thumbnail: String,
    /// Local file path of the downloaded thumbnail. Set only if the
    /// download for this record succeeded.
    #[serde(default)]
    pub thumbnail_local: Option<String>,
    /// Date the record was captured (`YYYY-MM-DD`), not a date from the
    /// product itself.
    pub registered_date: String,
}

impl Product {
    /// Returns `true` if this record carries a resolvable remote thumbnail.
    #[must_use]
    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail != SENTINEL && !self.thumbnail.is_empty()
    }

    /// Returns the local thumbnail path, if the download step set one.
    #[must_use]
    pub fn local_thumbnail_path(&self) -> Option<&str> {
        self.thumbnail_local.as_deref()
    }
}

/// Today's date in the `YYYY-MM-DD` form stamped onto every record.
#[must_use]
pub fn capture_date() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}
