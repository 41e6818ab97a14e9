use crate::UrlError;
use std::borrow::Cow;
use url::Url;

use super::domain::is_fetchable_scheme;

/// Resolves a raw link against the page it was found on
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` (absolute links are taken as-is; relative
///    paths, `..` segments and protocol-relative `//host/path` are joined)
/// 2. Remove the fragment (everything after #)
///
/// Nothing else is rewritten. The serialized form of the result is the
/// canonical key used for deduplication, so `/a` and `/a/` are different
/// pages.
///
/// # Arguments
///
/// * `raw` - The raw `href` value as extracted from the page
/// * `base` - The URL of the page the link was found on
///
/// # Returns
///
/// * `Ok(Url)` - Absolute URL without fragment
/// * `Err(UrlError::Malformed)` - The link cannot be parsed
///
/// # Examples
///
/// ```
/// use sumi_branch::url::normalize_link;
/// use url::Url;
///
/// let base = Url::parse("http://example.com/docs/intro").unwrap();
/// let url = normalize_link("../faq#top", &base).unwrap();
/// assert_eq!(url.as_str(), "http://example.com/faq");
/// ```
pub fn normalize_link(raw: &str, base: &Url) -> Result<Url, UrlError> {
    let mut url = base.join(raw).map_err(|source| UrlError::Malformed {
        raw: raw.to_string(),
        source,
    })?;

    url.set_fragment(None);

    Ok(url)
}

/// Parses the seed URL of a crawl
///
/// A seed without a scheme defaults to `http`. The seed must be an HTTP(S)
/// URL with a host; anything else is rejected before any crawling starts.
///
/// # Examples
///
/// ```
/// use sumi_branch::url::parse_seed;
///
/// let url = parse_seed("example.com/start").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/start");
/// ```
pub fn parse_seed(raw: &str) -> Result<Url, UrlError> {
    let trimmed = raw.trim();

    let candidate: Cow<'_, str> = if trimmed.contains("://") {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("http://{}", trimmed))
    };

    let mut url = Url::parse(&candidate).map_err(|source| UrlError::Malformed {
        raw: raw.to_string(),
        source,
    })?;

    if !is_fetchable_scheme(&url) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(raw.to_string()));
    }

    url.set_fragment(None);

    Ok(url)
}
