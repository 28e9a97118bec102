//! File, network and CSV plumbing around `fiscal-core`: policy files,
//! income-tax bracket tables, external rule feeds and exports.

pub mod export;
pub mod feeds;
pub mod loader;
pub mod policy;

pub use export::{ExportError, SimulationRecord, write_projection, write_simulations};
pub use feeds::{FileRuleFeed, HttpFeedConfig, HttpRuleFeed, feed_for};
pub use loader::{BracketLoader, BracketLoaderError, BracketRecord};
pub use policy::{PolicyFile, PolicyLoadError, builtin_book, load_policy_book};
