//! price_watch Library
//!
//! Extracts product prices from arbitrary storefront pages and watches
//! them until they drop to an owner's target.

pub mod common;
pub mod config;
pub mod extraction;
pub mod fetch;
pub mod watch;

// Re-export commonly used types
pub use common::errors::{Result, WatchError};
pub use common::traits::{DocumentFetcher, Notifier};
pub use common::types::{
    Alert, Evaluation, ExtractorKind, FetchedDocument, OutboundMessage, OwnerId, PriceCandidate,
    Watch, WatchId,
};
pub use config::types::AppConfig;
pub use extraction::{normalize_price, select_best, ExtractionPipeline};
pub use fetch::HttpFetcher;
pub use watch::{ChannelNotifier, CommandHandler, LogNotifier, PollingScheduler, WatchRegistry};
