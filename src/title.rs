use anyhow::Context;
use url::{ParseError, Url};

use crate::{
    html::{collect_paragraphs_with_class, collect_titles},
    http::Fetch,
};

/// Fetch `url` and return its title, or an empty string if there isn't a usable one.
///
/// A URL without a scheme is retried with `http://` and then `https://`. Transport errors are
/// returned as-is.
pub fn fetch_title(fetch: &dyn Fetch, url: &str) -> anyhow::Result<String> {
    let Some(target) = with_scheme(url) else {
        tracing::debug!(url, "no scheme works for URL; skipping title");
        return Ok(String::new());
    };
    let page = fetch
        .get(&target)
        .with_context(|| format!("failed to fetch page title from {target}"))?;
    if !page.is_ok() {
        tracing::debug!(status = page.status, "page unavailable; no title");
        return Ok(String::new());
    }
    Ok(extract_title(&page.body).unwrap_or_default())
}

/// The first of `url`, `http://url`, `https://url` that parses as an absolute URL.
fn with_scheme(url: &str) -> Option<Url> {
    for candidate in [url.to_string(), format!("http://{url}"), format!("https://{url}")] {
        match Url::parse(&candidate) {
            Ok(u) => return Some(u),
            Err(ParseError::RelativeUrlWithoutBase) => {
                tracing::debug!(%candidate, "missing scheme");
            }
            Err(e) => {
                tracing::debug!(%candidate, "unusable URL: {e}");
                return None;
            }
        }
    }
    None
}

/// A lone `<title>`, else the first `<p class="title">`.
pub fn extract_title(html: &str) -> Option<String> {
    let titles = collect_titles(html);
    if let [only] = titles.as_slice() {
        return Some(only.clone());
    }
    tracing::debug!(count = titles.len(), "no single <title>; trying <p class=\"title\">");
    collect_paragraphs_with_class(html, "title")
        .into_iter()
        .find(|t| !t.is_empty())
}
