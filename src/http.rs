use std::time::Duration;

use anyhow::Context;
use ureq::ResponseExt;
use url::Url;

use crate::config::Config;

/// A fetched document: status, the URL it was finally served from, and its body.
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub url: Url,
    pub body: String,
}

impl Page {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Everything that talks to the network goes through here.
pub trait Fetch {
    fn get(&self, url: &Url) -> anyhow::Result<Page>;
}

/// Blocking client backed by a single `ureq` agent.
///
/// Error statuses are returned as ordinary pages; only transport failures are errors.
pub struct HttpClient {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpClient {
    pub fn new(config: &Config) -> Self {
        let cfg = ureq::Agent::config_builder()
            .timeout_connect(Some(Duration::from_secs(5)))
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build();
        HttpClient {
            agent: ureq::Agent::new_with_config(cfg),
            user_agent: config.user_agent.clone(),
        }
    }
}

impl Fetch for HttpClient {
    fn get(&self, url: &Url) -> anyhow::Result<Page> {
        tracing::debug!(%url, "GET");
        let res = self
            .agent
            .get(url.as_str())
            .header("User-Agent", &self.user_agent)
            .call()
            .with_context(|| format!("failed request for URL {url}"))?;
        let status = res.status().as_u16();
        // Fall back to the request URL if the final one doesn't parse as a `Url`.
        let final_url = Url::parse(&res.get_uri().to_string()).unwrap_or_else(|_| url.clone());
        // Transcoded to UTF-8 from the charset named in Content-Type.
        let body = res
            .into_body()
            .read_to_string()
            .with_context(|| format!("failed to read body of {final_url}"))?;
        tracing::debug!(status, url = %final_url, bytes = body.len(), "response");
        Ok(Page {
            status,
            url: final_url,
            body,
        })
    }
}
