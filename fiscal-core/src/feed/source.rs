use async_trait::async_trait;
use thiserror::Error;

use crate::rules::ExternalRule;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("failed to fetch rule feed {location}: {reason}")]
    Transport { location: String, reason: String },

    #[error("rule feed {location} returned HTTP {status}: {body}")]
    Status {
        location: String,
        status: u16,
        body: String,
    },

    #[error("invalid rule feed {location}: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read rule feed {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of external rules (an HTTP endpoint, a local file, ...).
///
/// Implementations fetch once per call and do not retry; caching is left to
/// [`ExternalRuleCache`](super::ExternalRuleCache).
#[async_trait]
pub trait RuleFeed: Send + Sync {
    /// Where the rules come from, for logs and error messages.
    fn location(&self) -> &str;

    async fn fetch(&self) -> Result<Vec<ExternalRule>, FeedError>;
}

#[async_trait]
impl<T: RuleFeed + ?Sized> RuleFeed for Box<T> {
    fn location(&self) -> &str {
        (**self).location()
    }

    async fn fetch(&self) -> Result<Vec<ExternalRule>, FeedError> {
        (**self).fetch().await
    }
}
