//! Fetch module - retrieves product pages for the extraction pipeline

pub mod http;

pub use http::HttpFetcher;
