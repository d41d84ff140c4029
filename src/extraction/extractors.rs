//! Candidate extractors
//!
//! Each extractor scans a parsed document for one kind of price signal and
//! returns the raw strings it found. Extractors never interpret the text;
//! normalization and selection happen in the pipeline.
//!
//! | Extractor | Signal | Number format |
//! |-----------|--------|---------------|
//! | [`StructuredDataExtractor`] | `application/ld+json` blocks | machine |
//! | [`AttributeExtractor`] | meta / micro-data attributes | machine |
//! | [`ClassTextExtractor`] | text of known price classes | locale |
//! | [`EmbeddedStateExtractor`] | `NAME = {...};` script state | machine |
//! | [`FreeTextExtractor`] | `₺ 1.299` / `1.299 TL` runs | locale |

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use super::json_walk::collect_prices;
use super::normalize::NumberFormat;
use crate::common::errors::{Result, WatchError};
use crate::common::types::ExtractorKind;

/// Elements whose text never reaches the shopper
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// A fetched page, parsed once and shared by every extractor
pub struct Document<'a> {
    raw: &'a str,
    html: Html,
}

impl<'a> Document<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self {
            raw,
            html: Html::parse_document(raw),
        }
    }

    /// Unparsed page source
    pub fn raw(&self) -> &str {
        self.raw
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Text a browser would render, pieces trimmed and joined by spaces
    pub fn visible_text(&self) -> String {
        let mut pieces = Vec::new();
        for node in self.html.root_element().descendants() {
            let Some(text) = node.value().as_text() else {
                continue;
            };
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element().map(|el| el.name()))
                .map(|name| HIDDEN_ELEMENTS.contains(&name))
                .unwrap_or(false);
            if hidden {
                continue;
            }
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                pieces.push(trimmed);
            }
        }
        pieces.join(" ")
    }
}

/// A single price-signal scanning strategy
pub trait Extractor: Send + Sync {
    /// Which strategy this is, for logging and candidate tagging
    fn kind(&self) -> ExtractorKind;

    /// How the strings returned by `scan` are written
    fn number_format(&self) -> NumberFormat {
        NumberFormat::Locale
    }

    /// Scan the document and return every raw price string found
    fn scan(&self, document: &Document<'_>) -> Result<Vec<String>>;
}

/// Boxed extractor for dynamic dispatch
pub type BoxedExtractor = Box<dyn Extractor>;

fn compile_selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| WatchError::Extraction(format!("invalid selector {:?}: {:?}", css, e)))
}

fn compile_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| WatchError::Extraction(format!("invalid pattern: {}", e)))
}

// ============================================================================
// Structured data (JSON-LD)
// ============================================================================

/// Walks every JSON-LD block for price keys
///
/// A block that fails to parse is skipped; its siblings are still scanned.
#[derive(Debug, Default)]
pub struct StructuredDataExtractor;

impl StructuredDataExtractor {
    const SELECTOR: &'static str = r#"script[type="application/ld+json"]"#;

    pub fn new() -> Self {
        Self
    }
}

impl Extractor for StructuredDataExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::StructuredData
    }

    fn number_format(&self) -> NumberFormat {
        NumberFormat::Machine
    }

    fn scan(&self, document: &Document<'_>) -> Result<Vec<String>> {
        let selector = compile_selector(Self::SELECTOR)?;
        let mut found = Vec::new();

        for (index, block) in document.html().select(&selector).enumerate() {
            let text: String = block.text().collect();
            match serde_json::from_str::<serde_json::Value>(text.trim()) {
                Ok(value) => found.extend(collect_prices(&value)),
                Err(e) => debug!("Skipping malformed JSON-LD block {}: {}", index, e),
            }
        }

        Ok(found)
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// Lookups shared by every profile: (CSS selector, attribute)
pub const COMMON_PRICE_ATTRIBUTES: &[(&str, &str)] = &[
    (r#"meta[itemprop="price"]"#, "content"),
    (r#"meta[property="product:price:amount"]"#, "content"),
    (r#"meta[property="og:price:amount"]"#, "content"),
    (r#"[itemprop="price"][content]"#, "content"),
    ("[data-price]", "data-price"),
];

/// Reads prices carried directly in attribute values
///
/// Lookups are tried in order; the first one that matches any element
/// supplies all of the candidates.
#[derive(Debug, Clone)]
pub struct AttributeExtractor {
    lookups: Vec<(&'static str, &'static str)>,
}

impl AttributeExtractor {
    /// Profile-specific lookups first, then the common ones
    pub fn new(extra: &[(&'static str, &'static str)]) -> Self {
        let mut lookups = extra.to_vec();
        lookups.extend_from_slice(COMMON_PRICE_ATTRIBUTES);
        Self { lookups }
    }
}

impl Default for AttributeExtractor {
    fn default() -> Self {
        Self::new(&[])
    }
}

impl Extractor for AttributeExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::Attribute
    }

    fn number_format(&self) -> NumberFormat {
        NumberFormat::Machine
    }

    fn scan(&self, document: &Document<'_>) -> Result<Vec<String>> {
        for (css, attribute) in &self.lookups {
            let selector = compile_selector(css)?;
            let values: Vec<String> = document
                .html()
                .select(&selector)
                .filter_map(|el| el.value().attr(attribute))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect();
            if !values.is_empty() {
                return Ok(values);
            }
        }
        Ok(Vec::new())
    }
}

// ============================================================================
// Class text
// ============================================================================

/// Reads the visible text of elements carrying known price classes
#[derive(Debug, Clone)]
pub struct ClassTextExtractor {
    classes: Vec<&'static str>,
}

impl ClassTextExtractor {
    pub fn new(classes: &[&'static str]) -> Self {
        Self {
            classes: classes.to_vec(),
        }
    }
}

impl Extractor for ClassTextExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::ClassText
    }

    fn scan(&self, document: &Document<'_>) -> Result<Vec<String>> {
        for class in &self.classes {
            let selector = compile_selector(&format!(".{}", class))?;
            let texts: Vec<String> = document
                .html()
                .select(&selector)
                .map(|el| el.text().collect::<Vec<_>>().join(" ").trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
            if !texts.is_empty() {
                return Ok(texts);
            }
        }
        Ok(Vec::new())
    }
}

// ============================================================================
// Embedded script state
// ============================================================================

/// Finds `NAME = {...};` assignments in inline scripts and walks the JSON
#[derive(Debug, Clone)]
pub struct EmbeddedStateExtractor {
    patterns: Vec<(&'static str, Regex)>,
}

impl EmbeddedStateExtractor {
    pub fn new(variables: &[&'static str]) -> Result<Self> {
        let patterns = variables
            .iter()
            .map(|name| {
                let pattern = format!(r"(?s){}\s*=\s*(\{{.*?\}})\s*;", regex::escape(name));
                compile_regex(&pattern).map(|re| (*name, re))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl Extractor for EmbeddedStateExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::EmbeddedState
    }

    fn number_format(&self) -> NumberFormat {
        NumberFormat::Machine
    }

    fn scan(&self, document: &Document<'_>) -> Result<Vec<String>> {
        for (name, pattern) in &self.patterns {
            let Some(blob) = pattern.captures(document.raw()).and_then(|c| c.get(1)) else {
                continue;
            };
            let state: serde_json::Value = serde_json::from_str(blob.as_str())?;
            let found = collect_prices(&state);
            if !found.is_empty() {
                debug!("Embedded state {} yielded {} values", name, found.len());
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }
}

// ============================================================================
// Free text
// ============================================================================

/// What the free-text scan runs over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextScope {
    /// Rendered text only (generic profile)
    Visible,
    /// Whole page source including markup and scripts (specialized fallback)
    RawSource,
}

/// Currency-marked numeral runs: `₺ 1.299,00`, `TL 1.299`, `1.299,00 TL`, `1299 TRY`
const CURRENCY_PATTERN: &str = r"(?:₺|\bTL)\s*(\d[\d.,]*)|(\d[\d.,]*)\s*(?:TL|TRY)\b";

/// Last-resort scan for numbers next to a currency marker
#[derive(Debug, Clone)]
pub struct FreeTextExtractor {
    scope: TextScope,
    pattern: Regex,
}

impl FreeTextExtractor {
    pub fn new(scope: TextScope) -> Result<Self> {
        Ok(Self {
            scope,
            pattern: compile_regex(CURRENCY_PATTERN)?,
        })
    }

    pub fn scope(&self) -> TextScope {
        self.scope
    }
}

impl Extractor for FreeTextExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::FreeText
    }

    fn scan(&self, document: &Document<'_>) -> Result<Vec<String>> {
        let visible;
        let haystack = match self.scope {
            TextScope::Visible => {
                visible = document.visible_text();
                visible.as_str()
            }
            TextScope::RawSource => document.raw(),
        };

        Ok(self
            .pattern
            .captures_iter(haystack)
            .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
            .map(|m| m.as_str().to_string())
            .collect())
    }
}
