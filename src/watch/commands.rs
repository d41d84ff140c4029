//! Chat-style command parsing and handling

use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use super::registry::WatchRegistry;
use super::scheduler::evaluate_url;
use crate::common::errors::{Result, WatchError};
use crate::common::traits::DocumentFetcher;
use crate::common::types::OwnerId;
use crate::extraction::ExtractionPipeline;

pub const USAGE: &str = "Commands:\n\
/track <url> <target price>  watch a product page\n\
/list  show your watches\n\
/stop  remove all your watches";

const TRACK_USAGE: &str = "Usage: /track <url> <target price>, e.g. /track https://shop.example/p/1 4999";

/// A parsed owner command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Track { url: String, target_price: Decimal },
    List,
    Stop,
}

impl Command {
    /// Parse one line of input; `/cmd@botname` is accepted as `/cmd`
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split_whitespace();
        let head = parts
            .next()
            .ok_or_else(|| WatchError::InvalidInput(USAGE.to_string()))?;
        let name = head.split('@').next().unwrap_or(head).to_lowercase();

        match name.as_str() {
            "/start" | "/help" => Ok(Command::Start),
            "/list" => Ok(Command::List),
            "/stop" => Ok(Command::Stop),
            "/track" => {
                let (Some(url), Some(target), None) = (parts.next(), parts.next(), parts.next())
                else {
                    return Err(WatchError::InvalidInput(TRACK_USAGE.to_string()));
                };
                Ok(Command::Track {
                    url: validate_url(url)?,
                    target_price: parse_target_price(target)?,
                })
            }
            _ => Err(WatchError::InvalidInput(USAGE.to_string())),
        }
    }
}

/// Parse a user-typed target; a decimal comma is accepted
pub fn parse_target_price(raw: &str) -> Result<Decimal> {
    let invalid = || WatchError::InvalidInput("Target price must be a number, e.g. 4999".to_string());
    let value = Decimal::from_str(&raw.trim().replace(',', ".")).map_err(|_| invalid())?;
    if value <= Decimal::ZERO {
        return Err(WatchError::InvalidInput(
            "Target price must be greater than zero".to_string(),
        ));
    }
    Ok(value)
}

fn validate_url(raw: &str) -> Result<String> {
    let invalid = || WatchError::InvalidInput(format!("Not a valid http(s) link: {}", raw));
    let url = Url::parse(raw).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Ok(url.to_string()),
        _ => Err(invalid()),
    }
}

/// Executes commands against the registry and renders replies
pub struct CommandHandler {
    registry: Arc<WatchRegistry>,
    fetcher: Arc<dyn DocumentFetcher>,
    pipeline: Arc<ExtractionPipeline>,
    currency_label: String,
}

impl CommandHandler {
    pub fn new(
        registry: Arc<WatchRegistry>,
        fetcher: Arc<dyn DocumentFetcher>,
        pipeline: Arc<ExtractionPipeline>,
        currency_label: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            fetcher,
            pipeline,
            currency_label: currency_label.into(),
        }
    }

    /// Handle one line of input and return the reply text
    ///
    /// Bad input yields a usage reply, never an error.
    pub async fn handle(&self, owner: &OwnerId, text: &str) -> String {
        let command = match Command::parse(text) {
            Ok(command) => command,
            Err(WatchError::InvalidInput(reply)) => return reply,
            Err(e) => return e.to_string(),
        };
        debug!("Owner {} issued {:?}", owner, command);

        match command {
            Command::Start => format!("I watch product pages and tell you when the price drops.\n{}", USAGE),
            Command::Track { url, target_price } => self.track(owner, url, target_price).await,
            Command::List => self.list(owner).await,
            Command::Stop => {
                let removed = self.registry.clear(owner).await;
                format!("Stopped {} watch(es).", removed)
            }
        }
    }

    async fn track(&self, owner: &OwnerId, url: String, target_price: Decimal) -> String {
        let watch = match self.registry.add(owner, url, target_price).await {
            Ok(watch) => watch,
            Err(e) => return e.to_string(),
        };

        // seed probe: informational only, never triggers
        let price = evaluate_url(self.fetcher.as_ref(), &self.pipeline, &watch.source_url).await;
        self.registry
            .record_price(owner, watch.id, price, Utc::now())
            .await;
        info!("Seed probe for {}: {:?}", watch.id, price);

        let label = &self.currency_label;
        let mut reply = format!(
            "Watching {}\nTarget: {} {}",
            watch.source_url, target_price, label
        );
        match price {
            Some(price) => {
                reply.push_str(&format!("\nCurrent: {} {}", price, label));
                if price <= target_price {
                    reply.push_str("\nAlready at or below your target; you will be alerted on the next check.");
                }
            }
            None => reply.push_str("\nCould not read the price yet, will keep trying."),
        }
        reply
    }

    async fn list(&self, owner: &OwnerId) -> String {
        let watches = self.registry.list(owner).await;
        if watches.is_empty() {
            return "No watches.".to_string();
        }
        let label = &self.currency_label;
        watches
            .iter()
            .enumerate()
            .map(|(i, watch)| {
                let last = watch
                    .last_seen_price
                    .map(|p| format!("{} {}", p, label))
                    .unwrap_or_else(|| "?".to_string());
                format!(
                    "{}. {}\n   target {} {} | last {}",
                    i + 1,
                    watch.source_url,
                    watch.target_price,
                    label,
                    last
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::traits::MockDocumentFetcher;
    use crate::common::types::FetchedDocument;
    use rust_decimal_macros::dec;

    fn handler(fetcher: MockDocumentFetcher) -> (CommandHandler, Arc<WatchRegistry>) {
        let registry = Arc::new(WatchRegistry::new());
        let handler = CommandHandler::new(
            registry.clone(),
            Arc::new(fetcher),
            Arc::new(ExtractionPipeline::standard().unwrap()),
            "TL",
        );
        (handler, registry)
    }

    fn priced_fetcher(text: &'static str) -> MockDocumentFetcher {
        let mut fetcher = MockDocumentFetcher::new();
        fetcher.expect_fetch().returning(move |_| {
            Ok(FetchedDocument {
                body: format!("<body><p>{}</p></body>", text),
                final_host: "shop.example.org".to_string(),
            })
        });
        fetcher
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("/start").unwrap(), Command::Start);
        assert_eq!(Command::parse("/list@price_bot").unwrap(), Command::List);
        assert_eq!(Command::parse("  /stop ").unwrap(), Command::Stop);
        assert_eq!(
            Command::parse("/track https://shop.example.org/p/1 4999,90").unwrap(),
            Command::Track {
                url: "https://shop.example.org/p/1".to_string(),
                target_price: dec!(4999.90),
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(Command::parse("").is_err());
        assert!(Command::parse("/dance").is_err());
        assert!(Command::parse("/track https://shop.example.org/p/1").is_err());
        assert!(Command::parse("/track ftp://shop.example.org/p 10").is_err());
        assert!(Command::parse("/track shop.example.org 10").is_err());
        assert!(Command::parse("/track https://shop.example.org/p abc").is_err());
        assert!(Command::parse("/track https://shop.example.org/p -5").is_err());
        assert!(Command::parse("/track https://shop.example.org/p 0").is_err());
    }

    #[test]
    fn test_parse_target_price() {
        assert_eq!(parse_target_price("4999").unwrap(), dec!(4999));
        assert_eq!(parse_target_price("12,5").unwrap(), dec!(12.5));
        assert!(parse_target_price("1.234,50").is_err());
    }

    #[tokio::test]
    async fn test_track_seeds_price_without_triggering() {
        let (handler, registry) = handler(priced_fetcher("₺ 4.500"));
        let owner = OwnerId::from("console");

        let reply = handler
            .handle(&owner, "/track https://shop.example.org/p/1 4999")
            .await;
        assert!(reply.contains("Current: 4500 TL"));
        assert!(reply.contains("Already at or below"));

        let watches = registry.list(&owner).await;
        assert_eq!(watches.len(), 1);
        assert_eq!(watches[0].last_seen_price, Some(dec!(4500)));
    }

    #[tokio::test]
    async fn test_track_with_failed_probe() {
        let mut fetcher = MockDocumentFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|url| Err(WatchError::Timeout(url.to_string())));
        let (handler, registry) = handler(fetcher);
        let owner = OwnerId::from("console");

        let reply = handler
            .handle(&owner, "/track https://shop.example.org/p/1 4999")
            .await;
        assert!(reply.contains("Could not read the price yet"));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_and_stop() {
        let (handler, _registry) = handler(priced_fetcher("1.250 TL"));
        let owner = OwnerId::from("console");

        assert_eq!(handler.handle(&owner, "/list").await, "No watches.");
        handler.handle(&owner, "/track https://shop.example.org/a 1000").await;
        handler.handle(&owner, "/track https://shop.example.org/b 900").await;

        let listing = handler.handle(&owner, "/list").await;
        assert!(listing.starts_with("1. https://shop.example.org/a"));
        assert!(listing.contains("2. https://shop.example.org/b"));
        assert!(listing.contains("last 1250 TL"));

        assert_eq!(handler.handle(&owner, "/stop").await, "Stopped 2 watch(es).");
        assert_eq!(handler.handle(&owner, "/list").await, "No watches.");
    }

    #[tokio::test]
    async fn test_bad_command_replies_with_usage() {
        let (handler, registry) = handler(MockDocumentFetcher::new());
        let reply = handler.handle(&OwnerId::from("x"), "hello").await;
        assert!(reply.contains("/track"));
        assert!(registry.is_empty().await);
    }
}
