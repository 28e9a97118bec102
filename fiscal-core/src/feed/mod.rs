mod cache;
mod source;

pub use cache::ExternalRuleCache;
pub use source::{FeedError, RuleFeed};
