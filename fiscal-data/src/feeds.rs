//! [`RuleFeed`] backends: an HTTP endpoint and a local JSON file.
//!
//! Neither backend retries; a failed fetch is reported to the caller, whose
//! [`ExternalRuleCache`](fiscal_core::ExternalRuleCache) keeps its previous
//! contents.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use fiscal_core::rules::parse_external_rules;
use fiscal_core::{ExternalRule, FeedError, RuleFeed};
use tracing::debug;
use url::Url;

/// Configuration for [`HttpRuleFeed`].
#[derive(Debug, Clone)]
pub struct HttpFeedConfig {
    /// Address of the JSON document.
    pub url: String,
    /// Request timeout in seconds (default: 10).
    pub timeout_secs: u64,
}

impl HttpFeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: 10,
        }
    }
}

/// Fetches external rules with an HTTP GET.
#[derive(Debug)]
pub struct HttpRuleFeed {
    client: reqwest::Client,
    url: Url,
}

impl HttpRuleFeed {
    pub fn new(config: HttpFeedConfig) -> Result<Self, FeedError> {
        let url = Url::parse(config.url.trim()).map_err(|e| FeedError::Transport {
            location: config.url.clone(),
            reason: format!("invalid URL: {e}"),
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| FeedError::Transport {
                location: url.to_string(),
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl RuleFeed for HttpRuleFeed {
    fn location(&self) -> &str {
        self.url.as_str()
    }

    async fn fetch(&self) -> Result<Vec<ExternalRule>, FeedError> {
        let location = self.url.to_string();
        debug!(%location, "fetching external rules");

        let resp = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FeedError::Transport {
                location: location.clone(),
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| FeedError::Transport {
            location: location.clone(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(FeedError::Status {
                location,
                status: status.as_u16(),
                body,
            });
        }

        parse_external_rules(&body).map_err(|source| FeedError::Parse { location, source })
    }
}

/// Reads external rules from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileRuleFeed {
    path: PathBuf,
    location: String,
}

impl FileRuleFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.display().to_string();
        Self { path, location }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RuleFeed for FileRuleFeed {
    fn location(&self) -> &str {
        &self.location
    }

    async fn fetch(&self) -> Result<Vec<ExternalRule>, FeedError> {
        debug!(location = %self.location, "reading external rules");

        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FeedError::Io {
                location: self.location.clone(),
                source,
            })?;

        parse_external_rules(&text).map_err(|source| FeedError::Parse {
            location: self.location.clone(),
            source,
        })
    }
}

/// Picks the backend from the shape of `location`: `http://` and `https://`
/// addresses go over the network, anything else is a file path.
pub fn feed_for(location: &str) -> Result<Box<dyn RuleFeed>, FeedError> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpRuleFeed::new(HttpFeedConfig::new(location))?))
    } else {
        Ok(Box::new(FileRuleFeed::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn invalid_url_is_a_transport_error() {
        let err = HttpRuleFeed::new(HttpFeedConfig::new("not a url")).expect_err("bad url");

        assert!(matches!(err, FeedError::Transport { .. }));
    }

    #[test]
    fn feed_for_picks_backend_by_scheme() {
        let http = feed_for("https://reglas.example.com/feed.json").expect("valid url");
        let file = feed_for("rules/feed.json").expect("file path");

        assert_eq!(http.location(), "https://reglas.example.com/feed.json");
        assert_eq!(file.location(), "rules/feed.json");
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let feed = FileRuleFeed::new("/nonexistent/feed.json");

        let err = feed.fetch().await.expect_err("file does not exist");

        assert!(matches!(err, FeedError::Io { .. }));
    }
}
