use tracing::{debug, info};

use super::{FeedError, RuleFeed};
use crate::models::InputRecord;
use crate::rules::{ExternalRule, matching_external_rules};

/// Caller-owned cache in front of a [`RuleFeed`].
///
/// The feed is fetched on first use and the result reused until
/// [`refresh`](Self::refresh) or [`invalidate`](Self::invalidate) is called.
/// A failed fetch leaves the cache as it was.
#[derive(Debug)]
pub struct ExternalRuleCache<F> {
    feed: F,
    rules: Option<Vec<ExternalRule>>,
}

impl<F: RuleFeed> ExternalRuleCache<F> {
    pub fn new(feed: F) -> Self {
        Self { feed, rules: None }
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    pub fn is_loaded(&self) -> bool {
        self.rules.is_some()
    }

    /// Cached rules, fetching them first if needed.
    pub async fn rules(&mut self) -> Result<&[ExternalRule], FeedError> {
        if self.rules.is_none() {
            return self.refresh().await;
        }
        debug!(location = self.feed.location(), "using cached external rules");
        Ok(self.rules.as_deref().unwrap_or_default())
    }

    /// Fetches the feed again and replaces the cached rules.
    pub async fn refresh(&mut self) -> Result<&[ExternalRule], FeedError> {
        let rules = self.feed.fetch().await?;
        info!(
            location = self.feed.location(),
            count = rules.len(),
            "loaded external rules"
        );
        Ok(self.rules.insert(rules).as_slice())
    }

    /// Drops the cached rules; the next access fetches again.
    pub fn invalidate(&mut self) {
        self.rules = None;
    }

    /// External rules matching `input`, in feed order.
    pub async fn evaluate(
        &mut self,
        input: &InputRecord,
    ) -> Result<Vec<&ExternalRule>, FeedError> {
        let rules = self.rules().await?;
        Ok(matching_external_rules(rules, input))
    }

    /// The first matching external rule, if any.
    pub async fn recommendation(
        &mut self,
        input: &InputRecord,
    ) -> Result<Option<&ExternalRule>, FeedError> {
        Ok(self.evaluate(input).await?.into_iter().next())
    }
}
