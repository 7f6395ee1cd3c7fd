use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::{
    html::{Anchor, collect_anchors},
    http::Fetch,
};

const CITE_PREFIX: &str = "/w/index.php?title=Special:CiteThisPage";
const HISTORY_SUFFIX: &str = "&action=history";
const REVISION_DATE_CLASS: &str = "mw-changeslist-date";

/// A Wikipedia article URL.
pub struct Article {
    url: Url,
}

/// Citation data for a specific revision of an article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiCitation {
    /// Permanent link to the cited revision.
    pub url: String,
    pub author: String,
    /// Year of the latest edit, when the history page could be read.
    pub year: Option<String>,
}

/// The two MediaWiki links we care about on an article page.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ArticleLinks {
    pub cite: Option<String>,
    pub history: Option<String>,
}

impl Article {
    /// Accept only URLs whose host is `wikipedia.org` or one of its subdomains.
    pub fn parse(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        match url.scheme() {
            "http" | "https" => {}
            _ => return None,
        }
        let host = url.host_str()?.trim_end_matches('.').to_ascii_lowercase();
        if host == "wikipedia.org" || host.ends_with(".wikipedia.org") {
            Some(Article { url })
        } else {
            None
        }
    }

    /// Fetch the article and its history. `Ok(None)` when the article itself can't be fetched.
    pub fn resolve(&self, fetch: &dyn Fetch) -> anyhow::Result<Option<WikiCitation>> {
        let page = fetch
            .get(&self.url)
            .with_context(|| format!("failed to fetch Wikipedia article {}", self.url))?;
        if !page.is_ok() {
            tracing::warn!(status = page.status, url = %self.url, "Wikipedia article unavailable");
            return Ok(None);
        }

        let links = find_links(&collect_anchors(&page.body));
        let url = match links.cite.as_deref().and_then(|href| cite_url(&page.url, href)) {
            Some(url) => url,
            None => {
                tracing::warn!("no usable \"Cite this page\" link; citing {} as served", page.url);
                page.url.to_string()
            }
        };

        let history = links.history.as_deref().and_then(|href| match page.url.join(href) {
            Ok(u) => Some(u),
            Err(e) => {
                tracing::warn!(href, "unusable revision history link: {e}");
                None
            }
        });
        let year = match history {
            Some(history) => {
                let res = fetch
                    .get(&history)
                    .with_context(|| format!("failed to fetch revision history {history}"))?;
                if res.is_ok() {
                    latest_revision_year(&res.body)
                } else {
                    tracing::warn!(status = res.status, "revision history unavailable");
                    None
                }
            }
            None => {
                tracing::warn!("no revision history link on {}", page.url);
                None
            }
        };

        Ok(Some(WikiCitation {
            url,
            author: "Wikipedia".to_string(),
            year,
        }))
    }
}

/// Pick out the cite-this-page and history links. The last match of each wins.
pub fn find_links(anchors: &[Anchor]) -> ArticleLinks {
    let mut links = ArticleLinks::default();
    for href in anchors.iter().filter_map(|a| a.href.as_deref()) {
        if site_relative(href).starts_with(CITE_PREFIX) {
            links.cite = Some(href.to_string());
        }
        if href.ends_with(HISTORY_SUFFIX) {
            links.history = Some(href.to_string());
        }
    }
    links
}

/// `href` without its scheme and host, so `//host/w/...` and `https://host/w/...` read as `/w/...`.
fn site_relative(href: &str) -> &str {
    let rest = if let Some(rest) = href.strip_prefix("//") {
        rest
    } else if let Some((scheme, rest)) = href.split_once("://")
        && !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        rest
    } else {
        return href;
    };
    rest.find('/').map(|i| &rest[i..]).unwrap_or("")
}

/// Turn the cite-this-page link into a permanent link to the revision it names.
///
/// `href` may be relative, protocol-relative or absolute; it is resolved against `base`.
pub fn cite_url(base: &Url, href: &str) -> Option<String> {
    let joined = match base.join(href) {
        Ok(u) => u,
        Err(e) => {
            tracing::warn!(href, "unusable cite link: {e}");
            return None;
        }
    };
    Some(
        joined
            .as_str()
            .replace("Special:CiteThisPage&page=", "")
            .replace("&id=", "&oldid="),
    )
}

/// Year of the first dated entry on a history page.
pub fn latest_revision_year(html: &str) -> Option<String> {
    static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());
    let anchors = collect_anchors(html);
    let date = anchors.iter().find(|a| a.has_class(REVISION_DATE_CLASS))?;
    let year = YEAR_RE
        .captures(&date.text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());
    if year.is_none() {
        tracing::warn!(text = %date.text, "couldn't read a year from the revision date");
    }
    year
}
