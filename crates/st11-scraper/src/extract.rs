//! Product field extraction from the category listing DOM.
//!
//! All DOM reads happen in a single `page.evaluate` round trip that maps
//! every card anchor to an [`AnchorSnapshot`]. Turning a snapshot into a
//! [`Product`] is then a pure, total function: a field that cannot be
//! resolved degrades to the `"N/A"` sentinel, and a discovered anchor
//! always yields exactly one record, in DOM order.

use chromiumoxide::Page;
use serde::{Deserialize, Serialize};
use st11_core::{Product, SENTINEL};

use crate::error::ScraperError;

/// CSS selector for the per-product card anchor on a category page.
pub const CARD_ANCHOR_SELECTOR: &str = "a.c-card-item__anchor";

/// Everything the extractor reads from one card anchor and its siblings.
///
/// `None` and empty-string values both mean "not present in the markup";
/// the markup uses empty attributes for not-yet-lazy-loaded images.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSnapshot {
    /// The anchor's `href` (product detail link).
    pub href: Option<String>,
    /// The anchor's `data-log-body` attribute: an HTML-entity-encoded JSON
    /// payload that may carry `last_discount_price`.
    pub data_log: Option<String>,
    /// Text of the anchor's `span.sr-only` child (the accessible name).
    pub name_text: Option<String>,
    /// Text of the sibling `strong` price element, if rendered.
    pub price_text: Option<String>,
    /// The card image's `src` attribute.
    pub img_src: Option<String>,
    /// The card image's `data-src` attribute (lazy-load staging).
    pub img_data_src: Option<String>,
    /// The card image's `data-original` attribute (older lazy-load marker).
    pub img_data_original: Option<String>,
}

/// One-shot snapshot script: maps every card anchor to its raw fields.
///
/// The price element and the image live on the anchor's parent, not the
/// anchor itself, which is why the script walks one level up.
const SNAPSHOT_SCRIPT: &str = r#"
(() => {
    const anchors = Array.from(document.querySelectorAll("a.c-card-item__anchor"));
    return anchors.map((a) => {
        const parent = a.parentElement;
        const nameEl = a.querySelector("span.sr-only");
        const priceEl = parent ? parent.querySelector('strong[class*="price"]') : null;
        const img = parent ? parent.querySelector("img") : null;
        return {
            href: a.getAttribute("href"),
            data_log: a.getAttribute("data-log-body"),
            name_text: nameEl ? nameEl.textContent : null,
            price_text: priceEl ? priceEl.textContent : null,
            img_src: img ? img.getAttribute("src") : null,
            img_data_src: img ? img.getAttribute("data-src") : null,
            img_data_original: img ? img.getAttribute("data-original") : null,
        };
    });
})()
"#;

/// Collects one [`AnchorSnapshot`] per card anchor currently in the DOM.
///
/// # Errors
///
/// Returns [`ScraperError::Cdp`] if script evaluation fails, or
/// [`ScraperError::Snapshot`] if the returned value does not have the
/// expected shape.
pub async fn collect_snapshots(page: &Page) -> Result<Vec<AnchorSnapshot>, ScraperError> {
    page.evaluate(SNAPSHOT_SCRIPT)
        .await?
        .into_value::<Vec<AnchorSnapshot>>()
        .map_err(ScraperError::Snapshot)
}

/// Builds a [`Product`] from a snapshot, applying the per-field fallback
/// chains. Never fails; unresolved fields become the sentinel.
///
/// - name: trimmed accessible text, else sentinel;
/// - price: visible price text; else `last_discount_price` from the
///   entity-encoded JSON payload; else sentinel;
/// - thumbnail: first non-empty of `src`, `data-src`, `data-original`,
///   else sentinel.
#[must_use]
pub fn product_from_snapshot(snapshot: &AnchorSnapshot, captured_on: &str) -> Product {
    Product {
        url: non_empty(snapshot.href.as_deref())
            .map_or_else(|| SENTINEL.to_owned(), str::to_owned),
        name: resolve_name(snapshot),
        price: resolve_price(snapshot),
        thumbnail: resolve_thumbnail(snapshot),
        thumbnail_local: None,
        registered_date: captured_on.to_owned(),
    }
}

fn resolve_name(snapshot: &AnchorSnapshot) -> String {
    snapshot
        .name_text
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map_or_else(|| SENTINEL.to_owned(), str::to_owned)
}

fn resolve_price(snapshot: &AnchorSnapshot) -> String {
    if let Some(text) = non_empty(snapshot.price_text.as_deref().map(str::trim)) {
        return text.to_owned();
    }
    snapshot
        .data_log
        .as_deref()
        .and_then(parse_discount_price)
        .unwrap_or_else(|| SENTINEL.to_owned())
}

fn resolve_thumbnail(snapshot: &AnchorSnapshot) -> String {
    [
        snapshot.img_src.as_deref(),
        snapshot.img_data_src.as_deref(),
        snapshot.img_data_original.as_deref(),
    ]
    .into_iter()
    .find_map(non_empty)
    .map_or_else(|| SENTINEL.to_owned(), str::to_owned)
}

/// Extracts `last_discount_price` from the card's `data-log-body` payload.
///
/// The payload is JSON with double quotes HTML-entity-encoded as `&quot;`.
/// The field has been observed both as a string (`"9,900"`) and as a bare
/// number; both forms are accepted. Any decode or parse failure returns
/// `None` so the caller can degrade to the sentinel.
fn parse_discount_price(data_log: &str) -> Option<String> {
    if !data_log.contains("last_discount_price") {
        return None;
    }
    let decoded = data_log.replace("&quot;", "\"");
    let value: serde_json::Value = serde_json::from_str(&decoded).ok()?;
    match value.get("last_discount_price")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Treats `None` and empty/whitespace-only strings alike as absent.
fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
