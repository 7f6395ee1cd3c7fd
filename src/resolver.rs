use chrono::NaiveDate;

use crate::{
    archive,
    citation::{ArchivedCopy, Citation},
    config::Config,
    error::Url2BibError,
    http::Fetch,
    title::fetch_title,
    wikipedia::Article,
};

/// Gather everything we can about `url` into a [`Citation`].
///
/// Lookups run one after another: archive, Wikipedia (only for Wikipedia hosts), then the page
/// title. `on_stage` is told before each one starts.
pub fn resolve(
    fetch: &dyn Fetch,
    config: &Config,
    url: &str,
    today: NaiveDate,
    on_stage: &dyn Fn(&str),
) -> anyhow::Result<Citation> {
    if !url.starts_with("http") {
        return Err(Url2BibError::Usage.into());
    }
    let mut citation = Citation::new(url, today);

    if let Some(endpoint) = &config.archive_api {
        on_stage("checking the Wayback Machine");
        match archive::lookup(fetch, endpoint, url)? {
            Some(snap) => match archive::iso_timestamp(&snap.timestamp) {
                Some(date) => {
                    citation.snapshot = Some(ArchivedCopy {
                        url: snap.url,
                        date,
                    })
                }
                None => tracing::warn!(timestamp = %snap.timestamp, "ignoring snapshot with odd timestamp"),
            },
            None => tracing::debug!("no archived snapshot"),
        }
    }

    if let Some(article) = Article::parse(&citation.url) {
        on_stage("resolving Wikipedia revision");
        let wiki = article
            .resolve(fetch)?
            .ok_or_else(|| Url2BibError::WikipediaUnresolved {
                url: citation.url.clone(),
            })?;
        citation.url = wiki.url;
        citation.author = Some(wiki.author);
        match wiki.year {
            Some(year) => citation.year = year,
            None => tracing::warn!("latest edit year unknown; using {}", citation.year),
        }
    }

    on_stage("fetching page title");
    let title = fetch_title(fetch, &citation.url)?;
    if !title.is_empty() {
        citation.set_title(&title);
    }
    Ok(citation)
}
