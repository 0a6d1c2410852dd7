//! Thumbnail downloads.
//!
//! Downloads run strictly one at a time — a deliberate simplicity choice.
//! Each item's failure is isolated: a bad URL, a non-200 response, or an
//! I/O error is logged and the batch moves on, leaving that record's
//! `thumbnail_local` unset. The cancellation token is checked before every
//! item.

use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use tokio_util::sync::CancellationToken;

use st11_core::Product;

use crate::error::ScraperError;
use crate::events::EventSender;
use crate::normalize::normalize_thumbnail_url;

/// HTTP client for thumbnail bytes.
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    /// Creates an `ImageFetcher` with the configured per-request timeout
    /// and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Downloads every resolvable thumbnail into `dir`, enriching each
    /// successful record with its local file path.
    ///
    /// Files are named `<index>_<sanitized-name>.jpg` with a 1-based index
    /// matching the record's position, so the file-to-record association
    /// survives regardless of which downloads succeed. Records whose
    /// thumbnail is the sentinel are skipped. Returns the number of files
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Io`] only if the image directory itself
    /// cannot be created; per-item failures never propagate.
    pub async fn download_thumbnails(
        &self,
        products: &mut [Product],
        dir: &Path,
        cancel: &CancellationToken,
        events: &EventSender,
    ) -> Result<usize, ScraperError> {
        tokio::fs::create_dir_all(dir).await?;

        let total = products.len();
        let mut downloaded = 0usize;

        for (idx, product) in products.iter_mut().enumerate() {
            let item = idx + 1;
            if cancel.is_cancelled() {
                tracing::info!(item, total, "download loop cancelled");
                break;
            }
            if !product.has_thumbnail() {
                tracing::debug!(item, "no thumbnail URL; skipping download");
                continue;
            }

            let url = normalize_thumbnail_url(&product.thumbnail);
            match self.fetch_bytes(&url).await {
                Ok(bytes) => {
                    let path = dir.join(thumbnail_file_name(item, &product.name));
                    match tokio::fs::write(&path, &bytes).await {
                        Ok(()) => {
                            product.thumbnail_local = Some(path.to_string_lossy().into_owned());
                            downloaded += 1;
                            events.log(format!("downloaded image {item}/{total}"));
                        }
                        Err(e) => {
                            tracing::warn!(item, path = %path.display(), error = %e, "thumbnail write failed");
                            events.log(format!("image write failed ({item}): {e}"));
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(item, url = %url, error = %e, "thumbnail download failed");
                    events.log(format!("image download failed ({item}): {e}"));
                }
            }
        }

        Ok(downloaded)
    }

    /// Fetches one image, requiring an exact 200 response.
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ScraperError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// File name for one thumbnail: 1-based index plus the sanitized product
/// name.
#[must_use]
pub fn thumbnail_file_name(index: usize, name: &str) -> String {
    format!("{index}_{}.jpg", sanitize_name(name))
}

/// Keeps only alphanumerics, spaces, and underscores from the first 50
/// characters of the product name. Alphanumeric is Unicode-aware — product
/// names here are mostly Hangul.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .take(50)
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect()
}

#[cfg(test)]
#[path = "images_test.rs"]
mod tests;
