//! Thumbnail URL normalization.
//!
//! The listing markup mixes three URL shapes for the same CDN:
//! protocol-relative (`//cdn.11st.co.kr/...`), root-relative
//! (`/img/...`), and fully qualified. Downloads always need an absolute
//! `https` URL.

/// Origin every root-relative thumbnail path is resolved against.
pub const SITE_ORIGIN: &str = "https://www.11st.co.kr";

/// Resolves a raw thumbnail URL from the markup to an absolute form.
///
/// - `//host/p.jpg` → `https://host/p.jpg`
/// - `/p.jpg` → `https://www.11st.co.kr/p.jpg`
/// - anything else passes through unchanged.
#[must_use]
pub fn normalize_thumbnail_url(raw: &str) -> String {
    if let Some(rest) = raw.strip_prefix("//") {
        format!("https://{rest}")
    } else if raw.starts_with('/') {
        format!("{SITE_ORIGIN}{raw}")
    } else {
        raw.to_owned()
    }
}
