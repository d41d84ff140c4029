//! Document → price, via site profile, extractors and candidate selection

use rust_decimal::Decimal;
use tracing::{debug, warn};
use url::Url;

use super::extractors::Document;
use super::normalize::normalize_with;
use super::profiles::{ProfileSet, SiteProfile};
use super::selector::select_candidate;
use crate::common::errors::Result;
use crate::common::types::{ExtractorKind, PriceCandidate};

/// A price and where it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extraction {
    pub price: Decimal,
    pub source: ExtractorKind,
    pub profile: &'static str,
}

/// Runs the profile chosen for a host over a document
#[derive(Debug)]
pub struct ExtractionPipeline {
    profiles: ProfileSet,
}

impl ExtractionPipeline {
    pub fn new(profiles: ProfileSet) -> Self {
        Self { profiles }
    }

    /// Pipeline with the built-in storefront profiles
    pub fn standard() -> Result<Self> {
        Ok(Self::new(ProfileSet::standard()?))
    }

    pub fn profiles(&self) -> &ProfileSet {
        &self.profiles
    }

    /// Extract a price from `document`; `source` is a host or a full URL
    pub fn extract(&self, document: &str, source: &str) -> Option<Decimal> {
        self.extract_detailed(document, source).map(|e| e.price)
    }

    /// Like [`extract`](Self::extract) but reports the extractor and profile
    ///
    /// A specialized profile that yields nothing is followed by one run of
    /// the generic profile.
    pub fn extract_detailed(&self, document: &str, source: &str) -> Option<Extraction> {
        let host = host_of(source);
        let parsed = Document::parse(document);
        let profile = self.profiles.select(&host);

        if let Some(found) = run_profile(profile, &parsed) {
            debug!(
                "Extracted {} from {} via {}/{}",
                found.price, host, found.profile, found.source
            );
            return Some(found);
        }

        if profile.is_generic() {
            debug!("No price found on {}", host);
            return None;
        }

        debug!(
            "Profile {} found nothing on {}, retrying with generic",
            profile.name(),
            host
        );
        let found = run_profile(self.profiles.generic(), &parsed);
        if found.is_none() {
            debug!("No price found on {}", host);
        }
        found
    }
}

/// First extractor whose candidates survive normalization wins
fn run_profile(profile: &SiteProfile, document: &Document<'_>) -> Option<Extraction> {
    for extractor in profile.extractors() {
        let raw = match extractor.scan(document) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(
                    "Extractor {} failed in profile {}: {}",
                    extractor.kind(),
                    profile.name(),
                    e
                );
                continue;
            }
        };

        let format = extractor.number_format();
        let candidates: Vec<PriceCandidate> = raw
            .iter()
            .filter_map(|text| normalize_with(text, format))
            .map(|value| PriceCandidate {
                value,
                source: extractor.kind(),
            })
            .collect();
        if candidates.is_empty() {
            continue;
        }

        if let Some(best) = select_candidate(&candidates) {
            return Some(Extraction {
                price: best.value,
                source: best.source,
                profile: profile.name(),
            });
        }
    }
    None
}

/// Host of a URL, or the input itself when it is already a bare host
fn host_of(source: &str) -> String {
    Url::parse(source)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_else(|| source.to_string())
}
