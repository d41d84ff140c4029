//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use price_watch::common::errors::{Result, WatchError};
use price_watch::common::traits::{DocumentFetcher, Notifier};
use price_watch::common::types::{FetchedDocument, OwnerId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

/// Sample product pages
pub mod pages {
    /// Generic shop page with JSON-LD and a conflicting visible price
    pub const JSON_LD_PRODUCT: &str = r#"<!doctype html>
<html>
<head>
  <title>Kablosuz Kulaklık</title>
  <script type="application/ld+json">
  {
    "@context": "https://schema.org",
    "@type": "Product",
    "name": "Kablosuz Kulaklık",
    "offers": {"@type": "Offer", "price": "4999.00", "priceCurrency": "TRY"}
  }
  </script>
</head>
<body>
  <h1>Kablosuz Kulaklık</h1>
  <p class="old">₺ 5.499,00</p>
</body>
</html>"#;

    /// Price only available in visible text, next to shipping and ratings
    pub const TEXT_ONLY_PRODUCT: &str = r#"<html><body>
  <h1>Filtre Kahve Makinesi</h1>
  <div><s>₺ 1.899,00</s> <strong>₺ 1.649,90</strong></div>
  <div>Kargo: ₺ 39,90</div>
  <div>4.6 / 5 (1.024 değerlendirme)</div>
  <script>var fake = "₺ 9,99";</script>
</body></html>"#;

    /// Storefront page priced through its discount class
    pub const TRENDYOL_PRODUCT: &str = r#"<html><body>
  <div class="product-price-container">
    <span class="prc-org">2.199,00 TL</span>
    <span class="prc-dsc">1.899,00 TL</span>
  </div>
</body></html>"#;

    /// Storefront page whose only price lives in embedded state, in kuruş
    pub const EMBEDDED_STATE_PRODUCT: &str = r#"<html><head>
<script>window.__PRODUCT_DETAIL_APP_INITIAL_STATE__ = {"product":{"name":"Robot Süpürge","sellingPrice":1249900,"stock":12}};</script>
</head><body><div id="app"></div></body></html>"#;

    /// Nothing that looks like a price
    pub const NO_PRICE: &str = r#"<html><body><h1>Stokta yok</h1><p>4.5 / 5</p></body></html>"#;
}

/// Fetcher serving canned documents keyed by URL
#[derive(Default)]
pub struct StubFetcher {
    pages: Mutex<HashMap<String, std::result::Result<String, String>>>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(&self, url: &str, body: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Ok(body.to_string()));
    }

    pub fn fail(&self, url: &str, reason: &str) {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(reason.to_string()));
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedDocument> {
        self.calls.lock().unwrap().push(url.to_string());
        let entry = self.pages.lock().unwrap().get(url).cloned();
        match entry {
            Some(Ok(body)) => Ok(FetchedDocument {
                body,
                final_host: Url::parse(url)
                    .ok()
                    .and_then(|u| u.host_str().map(str::to_string))
                    .unwrap_or_default(),
            }),
            Some(Err(reason)) => Err(WatchError::Timeout(reason)),
            None => Err(WatchError::HttpStatus {
                status: 404,
                url: url.to_string(),
            }),
        }
    }
}

/// Notifier that remembers every message it was asked to deliver
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(OwnerId, String)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(OwnerId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, owner: &OwnerId, message: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((owner.clone(), message.to_string()));
        Ok(())
    }
}
