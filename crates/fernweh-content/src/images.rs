//! Image URL optimization for CMS-hosted assets.
//!
//! The CMS serves original-size images unless delivery transforms are
//! requested via query parameters. This module rewrites asset URLs, both
//! standalone and embedded in story HTML, to carry `format`, `width` and
//! `quality` parameters, after stripping the signed-transform parameters
//! (`key`, `width`, `height`) that would conflict with them.

use std::sync::LazyLock;

use regex::Regex;
use tracing::error;
use url::Url;

/// Path segment identifying URLs that point at managed media assets.
pub const ASSET_PATH_MARKER: &str = "/assets/";

/// Upstream signed-transform parameters stripped before optimization
/// parameters are applied. `height` is removed and never re-added.
const CONFLICTING_PARAMS: [&str; 3] = ["key", "width", "height"];

/// Synthetic base so relative asset paths decompose into path + query.
/// Never appears in output: relative inputs are reassembled from path and
/// query alone.
static DUMMY_BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("http://dummy-base.invalid").unwrap());

/// Matches `src="..."` attributes; the value must not contain a quote.
static SRC_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());

/// Delivery transform parameters applied to asset URLs.
///
/// Each setting is applied independently when present; values are not
/// validated against what the delivery service supports. [`Default`] is the
/// site-wide default set (`webp`, 800px, quality 100).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageOptions {
    /// Target encoding, e.g. `webp`.
    pub format: Option<String>,
    /// Target pixel width, as a numeric string.
    pub width: Option<String>,
    /// Target quality 0-100, as a numeric string.
    pub quality: Option<String>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            format: Some("webp".to_owned()),
            width: Some("800".to_owned()),
            quality: Some("100".to_owned()),
        }
    }
}

impl ImageOptions {
    /// Options that apply no transform parameters. Conflicting upstream
    /// parameters are still stripped.
    #[must_use]
    pub fn none() -> Self {
        Self {
            format: None,
            width: None,
            quality: None,
        }
    }
}

/// Rewrite an asset URL to request the given delivery transforms.
///
/// Accepts absolute URLs, protocol-relative URLs and bare paths; HTML-escaped
/// ampersands in the input are unescaped before parsing. Existing `key`,
/// `width` and `height` parameters are removed, then `format`/`width`/
/// `quality` are set from `options` (overwriting prior values). Relative
/// inputs come back as `path?query` with no host.
///
/// Fail-open: if the input cannot be parsed as a URL it is returned
/// verbatim and the failure is logged.
#[must_use]
pub fn optimize_image_url(url: &str, options: &ImageOptions) -> String {
    match try_optimize(url, options) {
        Ok(optimized) => optimized,
        Err(err) => {
            error!("Error optimizing image URL '{}': {}", url, err);
            url.to_owned()
        }
    }
}

fn try_optimize(url: &str, options: &ImageOptions) -> Result<String, url::ParseError> {
    // Story HTML carries escaped ampersands between query parameters.
    let clean = url.replace("&amp;", "&");

    let is_absolute = clean.starts_with("http") || clean.starts_with("//");
    let mut parsed = DUMMY_BASE.join(&clean)?;

    let mut pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(name, _)| !CONFLICTING_PARAMS.contains(&name.as_ref()))
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();

    set_param(&mut pairs, "format", options.format.as_deref());
    set_param(&mut pairs, "width", options.width.as_deref());
    set_param(&mut pairs, "quality", options.quality.as_deref());

    if pairs.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(&pairs);
    }

    Ok(if is_absolute {
        parsed.to_string()
    } else {
        match parsed.query() {
            Some(query) => format!("{}?{query}", parsed.path()),
            None => parsed.path().to_owned(),
        }
    })
}

/// Set `name` to `value`, replacing any existing occurrence. Empty values
/// count as absent, like the rest of the options handling.
fn set_param(pairs: &mut Vec<(String, String)>, name: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        pairs.retain(|(existing, _)| existing != name);
        pairs.push((name.to_owned(), value.to_owned()));
    }
}

/// Rewrite every managed-asset `src` attribute in a story's HTML.
///
/// Scans for `src="..."` occurrences textually; the input is never parsed
/// as HTML, so malformed markup passes through untouched apart from the
/// literal attribute replacements. Attributes whose value does not contain
/// [`ASSET_PATH_MARKER`] are left byte-identical.
#[must_use]
pub fn optimize_content(html: &str, options: &ImageOptions) -> String {
    if html.is_empty() {
        return String::new();
    }

    SRC_ATTR_RE
        .replace_all(html, |caps: &regex::Captures| {
            let url = &caps[1];
            if url.contains(ASSET_PATH_MARKER) {
                format!(r#"src="{}""#, optimize_image_url(url, options))
            } else {
                caps[0].to_owned()
            }
        })
        .into_owned()
}
