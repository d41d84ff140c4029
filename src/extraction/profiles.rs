//! Site profiles: which extractors run, in which order, for which hosts

use super::extractors::{
    AttributeExtractor, BoxedExtractor, ClassTextExtractor, EmbeddedStateExtractor,
    FreeTextExtractor, StructuredDataExtractor, TextScope,
};
use crate::common::errors::Result;

/// Name of the profile used when no host matches
pub const GENERIC_PROFILE: &str = "generic";

/// An ordered extractor chain bound to a set of domains
pub struct SiteProfile {
    name: &'static str,
    domains: &'static [&'static str],
    extractors: Vec<BoxedExtractor>,
}

impl SiteProfile {
    pub fn new(
        name: &'static str,
        domains: &'static [&'static str],
        extractors: Vec<BoxedExtractor>,
    ) -> Self {
        Self {
            name,
            domains,
            extractors,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn extractors(&self) -> &[BoxedExtractor] {
        &self.extractors
    }

    pub fn is_generic(&self) -> bool {
        self.domains.is_empty()
    }

    /// Substring match of a normalized host against this profile's domains
    pub fn matches(&self, normalized_host: &str) -> bool {
        self.domains.iter().any(|domain| normalized_host.contains(domain))
    }
}

impl std::fmt::Debug for SiteProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteProfile")
            .field("name", &self.name)
            .field("domains", &self.domains)
            .field(
                "extractors",
                &self.extractors.iter().map(|e| e.kind()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Static description of a specialized storefront
struct Storefront {
    name: &'static str,
    domains: &'static [&'static str],
    attributes: &'static [(&'static str, &'static str)],
    classes: &'static [&'static str],
    state_variables: &'static [&'static str],
}

const STOREFRONTS: &[Storefront] = &[
    Storefront {
        name: "trendyol",
        domains: &["trendyol.com"],
        attributes: &[],
        classes: &["prc-dsc", "prc-slg", "product-price-container"],
        state_variables: &["window.__PRODUCT_DETAIL_APP_INITIAL_STATE__"],
    },
    Storefront {
        name: "hepsiburada",
        domains: &["hepsiburada.com"],
        attributes: &[(r#"[data-test-id="price-current-price"]"#, "content")],
        classes: &["price-value", "product-price"],
        state_variables: &["window.__INITIAL_STATE__", "window.__REDUX_STATE__"],
    },
    Storefront {
        name: "n11",
        domains: &["n11.com"],
        attributes: &[],
        classes: &["newPrice", "unf-p-summary-price"],
        state_variables: &["window.productDetailModel"],
    },
    Storefront {
        name: "amazon",
        domains: &["amazon.com.tr"],
        attributes: &[("#twister-plus-price-data-price", "value")],
        classes: &["a-offscreen", "a-price-whole"],
        state_variables: &["window.__PRELOADED_STATE__"],
    },
    Storefront {
        name: "mediamarkt",
        domains: &["mediamarkt.com.tr"],
        attributes: &[],
        classes: &["price", "product-price"],
        state_variables: &["window.__PRELOADED_STATE__"],
    },
];

impl Storefront {
    /// Structured data, attributes, classes, script state, raw-source fallback
    fn build(&self) -> Result<SiteProfile> {
        let extractors: Vec<BoxedExtractor> = vec![
            Box::new(StructuredDataExtractor::new()),
            Box::new(AttributeExtractor::new(self.attributes)),
            Box::new(ClassTextExtractor::new(self.classes)),
            Box::new(EmbeddedStateExtractor::new(self.state_variables)?),
            Box::new(FreeTextExtractor::new(TextScope::RawSource)?),
        ];
        Ok(SiteProfile::new(self.name, self.domains, extractors))
    }
}

/// Structured data, then a visible-text scan
pub fn generic_profile() -> Result<SiteProfile> {
    let extractors: Vec<BoxedExtractor> = vec![
        Box::new(StructuredDataExtractor::new()),
        Box::new(FreeTextExtractor::new(TextScope::Visible)?),
    ];
    Ok(SiteProfile::new(GENERIC_PROFILE, &[], extractors))
}

/// Lower-case, drop a trailing dot and a leading `www.`
pub fn normalize_host(host: &str) -> String {
    let lowered = host.trim().trim_end_matches('.').to_ascii_lowercase();
    match lowered.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// All known profiles plus the generic fallback
#[derive(Debug)]
pub struct ProfileSet {
    specialized: Vec<SiteProfile>,
    generic: SiteProfile,
}

impl ProfileSet {
    pub fn new(specialized: Vec<SiteProfile>, generic: SiteProfile) -> Self {
        Self {
            specialized,
            generic,
        }
    }

    /// Built-in storefront profiles
    pub fn standard() -> Result<Self> {
        let specialized = STOREFRONTS
            .iter()
            .map(Storefront::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(specialized, generic_profile()?))
    }

    /// Profile for `host`, or the generic one when nothing matches
    pub fn select(&self, host: &str) -> &SiteProfile {
        let normalized = normalize_host(host);
        self.specialized
            .iter()
            .find(|profile| profile.matches(&normalized))
            .unwrap_or(&self.generic)
    }

    pub fn generic(&self) -> &SiteProfile {
        &self.generic
    }

    pub fn specialized(&self) -> &[SiteProfile] {
        &self.specialized
    }
}
