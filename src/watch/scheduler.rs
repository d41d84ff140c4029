//! Polling scheduler: re-evaluates every watch on a fixed interval

use chrono::Utc;
use futures_util::future::join_all;
use futures_util::stream::{self, StreamExt};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use super::registry::WatchRegistry;
use crate::common::traits::{DocumentFetcher, Notifier};
use crate::common::types::{Evaluation, OwnerId, Watch};
use crate::config::types::SchedulerConfig;
use crate::extraction::ExtractionPipeline;

/// Counters for one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Watches fetched and run through the pipeline
    pub evaluated: usize,
    /// Evaluations that produced no price (fetch or extraction failure)
    pub unknown: usize,
    /// Watches removed because their target was reached
    pub triggered: usize,
    /// Alerts the notifier failed to deliver
    pub notify_failures: usize,
}

impl CycleReport {
    fn merge(mut self, other: CycleReport) -> Self {
        self.evaluated += other.evaluated;
        self.unknown += other.unknown;
        self.triggered += other.triggered;
        self.notify_failures += other.notify_failures;
        self
    }
}

/// Fetch a page and run it through the pipeline; any failure is `None`
///
/// HTML parsing happens on the blocking pool.
pub async fn evaluate_url(
    fetcher: &dyn DocumentFetcher,
    pipeline: &Arc<ExtractionPipeline>,
    url: &str,
) -> Option<Decimal> {
    let document = match fetcher.fetch(url).await {
        Ok(document) => document,
        Err(e) => {
            warn!("Fetch failed for {}: {}", url, e);
            return None;
        }
    };

    let pipeline = pipeline.clone();
    match tokio::task::spawn_blocking(move || {
        pipeline.extract(&document.body, &document.final_host)
    })
    .await
    {
        Ok(price) => price,
        Err(e) => {
            warn!("Extraction task failed for {}: {}", url, e);
            None
        }
    }
}

/// Drives discrete, non-overlapping evaluation cycles
pub struct PollingScheduler {
    registry: Arc<WatchRegistry>,
    fetcher: Arc<dyn DocumentFetcher>,
    notifier: Arc<dyn Notifier>,
    pipeline: Arc<ExtractionPipeline>,
    config: SchedulerConfig,
    currency_label: String,
}

impl PollingScheduler {
    pub fn new(
        registry: Arc<WatchRegistry>,
        fetcher: Arc<dyn DocumentFetcher>,
        notifier: Arc<dyn Notifier>,
        pipeline: Arc<ExtractionPipeline>,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            registry,
            fetcher,
            notifier,
            pipeline,
            config,
            currency_label: "TL".to_string(),
        }
    }

    /// Set the label printed after prices in alerts
    pub fn with_currency_label(mut self, label: impl Into<String>) -> Self {
        self.currency_label = label.into();
        self
    }

    /// Run cycles until `shutdown` flips to true or its sender is dropped
    ///
    /// A cycle in progress always completes; ticks missed while it ran are
    /// skipped rather than replayed.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let start = Instant::now() + self.config.first_run_delay();
        let mut ticker = interval_at(start, self.config.interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Scheduler started: first cycle in {:?}, then every {:?}",
            self.config.first_run_delay(),
            self.config.interval()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let report = self.run_cycle().await;
                    info!(
                        "Cycle done: {} evaluated, {} unknown, {} triggered, {} notify failures",
                        report.evaluated, report.unknown, report.triggered, report.notify_failures
                    );
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Scheduler stopping");
                        break;
                    }
                }
            }
        }
    }

    /// Evaluate every active watch once
    ///
    /// `max_concurrent_fetches` bounds in-flight evaluations across all
    /// owners. Results are then committed per owner.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> CycleReport {
        let owners = self.registry.owners().await;
        debug!("Cycle over {} owners", owners.len());

        let mut watches = Vec::new();
        for owner in &owners {
            watches.extend(self.registry.snapshot(owner).await);
        }
        if watches.is_empty() {
            return CycleReport::default();
        }

        let evaluations: Vec<(OwnerId, Evaluation)> = stream::iter(watches)
            .map(|watch| async move {
                let evaluation = self.evaluate(&watch).await;
                (watch.owner_id, evaluation)
            })
            .buffer_unordered(self.config.max_concurrent_fetches.max(1))
            .collect()
            .await;

        let mut by_owner: HashMap<OwnerId, Vec<Evaluation>> = HashMap::new();
        for (owner, evaluation) in evaluations {
            by_owner.entry(owner).or_default().push(evaluation);
        }

        join_all(
            by_owner
                .into_iter()
                .map(|(owner, evaluations)| self.commit_owner(owner, evaluations)),
        )
        .await
        .into_iter()
        .fold(CycleReport::default(), CycleReport::merge)
    }

    async fn commit_owner(&self, owner: OwnerId, evaluations: Vec<Evaluation>) -> CycleReport {
        let mut report = CycleReport {
            evaluated: evaluations.len(),
            unknown: evaluations.iter().filter(|e| e.price.is_none()).count(),
            ..CycleReport::default()
        };

        let alerts = self.registry.commit_cycle(&owner, &evaluations).await;
        report.triggered = alerts.len();

        for alert in alerts {
            info!(
                "Watch triggered for {}: {} at {} (target {})",
                alert.owner_id, alert.source_url, alert.price, alert.target_price
            );
            let message = alert.message(&self.currency_label);
            if let Err(e) = self.notifier.notify(&alert.owner_id, &message).await {
                warn!("Alert delivery to {} failed: {}", alert.owner_id, e);
                report.notify_failures += 1;
            }
        }

        report
    }

    async fn evaluate(&self, watch: &Watch) -> Evaluation {
        let price = evaluate_url(self.fetcher.as_ref(), &self.pipeline, &watch.source_url).await;
        Evaluation {
            watch_id: watch.id,
            price,
            checked_at: Utc::now(),
        }
    }
}
