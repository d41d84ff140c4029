//! Extraction module - turns an arbitrary product page into a price
//!
//! ```text
//!   document + host
//!        │
//!        ▼
//!   ProfileSet::select(host) ──► SiteProfile (ordered extractors)
//!        │
//!        ▼
//!   Extractor::scan ──► raw strings ──► normalize ──► candidates
//!        │                                               │
//!        │        first non-empty candidate set          ▼
//!        └────────────────────────────────────►  select_best ──► price
//! ```
//!
//! A specialized profile that finds nothing is followed by the generic
//! profile before the pipeline reports an unknown price.

pub mod extractors;
pub mod json_walk;
pub mod normalize;
pub mod pipeline;
pub mod profiles;
pub mod selector;

pub use extractors::{Document, Extractor};
pub use normalize::{normalize_machine_price, normalize_price, NumberFormat};
pub use pipeline::{Extraction, ExtractionPipeline};
pub use profiles::{ProfileSet, SiteProfile};
pub use selector::{correct_minor_unit, select_best, select_candidate};
