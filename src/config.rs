use std::time::Duration;

use anyhow::Context;
use url::Url;

use crate::cli::Cli;

/// Runtime settings, resolved once from the command line and environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub timeout: Duration,
    /// `None` when archive lookups are switched off.
    pub archive_api: Option<Url>,
    pub user_agent: String,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> anyhow::Result<Self> {
        let archive_api = if cli.no_archive {
            None
        } else {
            Some(
                Url::parse(&cli.archive_api)
                    .with_context(|| format!("invalid archive endpoint {}", cli.archive_api))?,
            )
        };
        Ok(Config {
            timeout: Duration::from_secs(cli.timeout.max(1)),
            archive_api,
            user_agent: cli
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout: Duration::from_secs(15),
            archive_api: Url::parse(crate::cli::DEFAULT_ARCHIVE_API).ok(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("url2bib/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn no_archive_clears_endpoint() {
        let cli = Cli::try_parse_from(["url2bib", "--no-archive", "http://a.b"]).unwrap();
        let cfg = Config::from_cli(&cli).unwrap();
        assert!(cfg.archive_api.is_none());
    }

    #[test]
    fn bad_endpoint_is_an_error() {
        let cli = Cli::try_parse_from(["url2bib", "--archive-api", "not a url", "http://a.b"])
            .unwrap();
        let err = Config::from_cli(&cli).unwrap_err();
        assert!(err.to_string().contains("invalid archive endpoint"));
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let cli = Cli::try_parse_from(["url2bib", "--timeout", "0", "http://a.b"]).unwrap();
        let cfg = Config::from_cli(&cli).unwrap();
        assert_eq!(cfg.timeout, Duration::from_secs(1));
        assert!(cfg.user_agent.starts_with("url2bib/"));
    }
}
