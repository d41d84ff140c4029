//! Shared types used across extraction and watch handling

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Opaque identifier of the session that owns a watch (chat, user, console)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for OwnerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for OwnerId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry-assigned watch identifier, unique within the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WatchId(pub u64);

impl std::fmt::Display for WatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One tracked product for one owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watch {
    pub id: WatchId,
    pub owner_id: OwnerId,
    /// Page to re-fetch every cycle
    pub source_url: String,
    /// Always positive, fixed at creation
    pub target_price: Decimal,
    /// `None` until a price is read, and again after a failed evaluation
    pub last_seen_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl Watch {
    /// True once the observed price has reached the target
    pub fn is_satisfied_by(&self, price: Option<Decimal>) -> bool {
        matches!(price, Some(p) if p <= self.target_price)
    }
}

/// Result of evaluating one watch during a cycle
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub watch_id: WatchId,
    pub price: Option<Decimal>,
    pub checked_at: DateTime<Utc>,
}

/// Alert queued for an owner when a watch triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub owner_id: OwnerId,
    pub source_url: String,
    pub price: Decimal,
    pub target_price: Decimal,
    pub triggered_at: DateTime<Utc>,
}

impl Alert {
    /// Human-readable alert text
    pub fn message(&self, currency_label: &str) -> String {
        format!(
            "Price dropped to your target!\n{}\nNow: {} {} | Target: {} {}",
            self.source_url, self.price, currency_label, self.target_price, currency_label
        )
    }
}

/// Message handed to a notifier, as carried over a notification channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub owner_id: OwnerId,
    pub text: String,
}

/// Raw page returned by a fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub body: String,
    /// Host after redirects; drives site profile selection
    pub final_host: String,
}

/// Which scanning strategy produced a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    StructuredData,
    Attribute,
    ClassText,
    EmbeddedState,
    FreeText,
}

impl std::fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractorKind::StructuredData => write!(f, "structured_data"),
            ExtractorKind::Attribute => write!(f, "attribute"),
            ExtractorKind::ClassText => write!(f, "class_text"),
            ExtractorKind::EmbeddedState => write!(f, "embedded_state"),
            ExtractorKind::FreeText => write!(f, "free_text"),
        }
    }
}

/// A normalized value and the extractor it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCandidate {
    pub value: Decimal,
    pub source: ExtractorKind,
}
