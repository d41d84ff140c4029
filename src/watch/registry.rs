//! In-memory store of active watches, keyed by owner
//!
//! Every owner's list sits behind its own mutex. The outer map lock is
//! taken exclusively only to create or prune an owner's entry, so commands
//! for one owner never wait on a scheduler commit for another. Entries are
//! pruned as soon as their list empties.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::common::errors::{Result, WatchError};
use crate::common::types::{Alert, Evaluation, OwnerId, Watch, WatchId};

type WatchList = Arc<Mutex<Vec<Watch>>>;

/// Authoritative set of watches
#[derive(Debug, Default)]
pub struct WatchRegistry {
    owners: RwLock<HashMap<OwnerId, WatchList>>,
    next_id: AtomicU64,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    async fn list_for(&self, owner: &OwnerId) -> Option<WatchList> {
        self.owners.read().await.get(owner).cloned()
    }

    /// Drop an owner's entry once its list is empty
    ///
    /// Runs under the map write lock so no `add` can be pushing into the
    /// list being removed.
    async fn prune_if_empty(&self, owner: &OwnerId) {
        let mut owners = self.owners.write().await;
        let empty = match owners.get(owner) {
            Some(list) => list.lock().await.is_empty(),
            None => false,
        };
        if empty {
            owners.remove(owner);
            debug!("Owner {} has no watches left", owner);
        }
    }

    /// Append a watch to the owner's list
    ///
    /// Fails with `InvalidInput` when the target is not positive.
    pub async fn add(
        &self,
        owner: &OwnerId,
        source_url: impl Into<String>,
        target_price: Decimal,
    ) -> Result<Watch> {
        if target_price <= Decimal::ZERO {
            return Err(WatchError::InvalidInput(format!(
                "Target price must be positive, got {}",
                target_price
            )));
        }

        let watch = Watch {
            id: WatchId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1),
            owner_id: owner.clone(),
            source_url: source_url.into(),
            target_price,
            last_seen_price: None,
            created_at: Utc::now(),
            last_checked_at: None,
        };

        // push while holding the map lock so pruning cannot orphan the list
        {
            let owners = self.owners.read().await;
            if let Some(list) = owners.get(owner).cloned() {
                list.lock().await.push(watch.clone());
            } else {
                drop(owners);
                let mut owners = self.owners.write().await;
                owners
                    .entry(owner.clone())
                    .or_default()
                    .lock()
                    .await
                    .push(watch.clone());
            }
        }
        info!("Owner {} added watch {} on {}", owner, watch.id, watch.source_url);
        Ok(watch)
    }

    /// Owner's watches in insertion order
    pub async fn list(&self, owner: &OwnerId) -> Vec<Watch> {
        match self.list_for(owner).await {
            Some(list) => list.lock().await.clone(),
            None => Vec::new(),
        }
    }

    /// Remove every watch of an owner, returning how many were removed
    pub async fn clear(&self, owner: &OwnerId) -> usize {
        let Some(list) = self.list_for(owner).await else {
            return 0;
        };
        let removed = {
            let mut guard = list.lock().await;
            let removed = guard.len();
            guard.clear();
            removed
        };
        self.prune_if_empty(owner).await;
        info!("Owner {} cleared {} watches", owner, removed);
        removed
    }

    /// Owners that currently have at least one watch
    pub async fn owners(&self) -> Vec<OwnerId> {
        let entries: Vec<(OwnerId, WatchList)> = self
            .owners
            .read()
            .await
            .iter()
            .map(|(owner, list)| (owner.clone(), list.clone()))
            .collect();

        let mut active = Vec::with_capacity(entries.len());
        for (owner, list) in entries {
            if !list.lock().await.is_empty() {
                active.push(owner);
            }
        }
        active.sort();
        active
    }

    /// Copy of an owner's list for evaluation outside any lock
    pub async fn snapshot(&self, owner: &OwnerId) -> Vec<Watch> {
        self.list(owner).await
    }

    /// Total number of watches across owners
    pub async fn len(&self) -> usize {
        let lists: Vec<WatchList> = self.owners.read().await.values().cloned().collect();
        let mut total = 0;
        for list in lists {
            total += list.lock().await.len();
        }
        total
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Store an out-of-band price reading (seed probe) without triggering
    ///
    /// Returns false if the watch no longer exists.
    pub async fn record_price(
        &self,
        owner: &OwnerId,
        watch_id: WatchId,
        price: Option<Decimal>,
        checked_at: DateTime<Utc>,
    ) -> bool {
        let Some(list) = self.list_for(owner).await else {
            return false;
        };
        let mut guard = list.lock().await;
        match guard.iter_mut().find(|w| w.id == watch_id) {
            Some(watch) => {
                watch.last_seen_price = price;
                watch.last_checked_at = Some(checked_at);
                true
            }
            None => false,
        }
    }

    /// Apply one cycle's evaluations to an owner's list
    ///
    /// Satisfied watches are removed and returned as alerts; the rest take
    /// the new reading. Watches added while the cycle was running have no
    /// evaluation and are kept untouched; evaluations for watches cleared in
    /// the meantime are dropped.
    pub async fn commit_cycle(&self, owner: &OwnerId, evaluations: &[Evaluation]) -> Vec<Alert> {
        let Some(list) = self.list_for(owner).await else {
            return Vec::new();
        };
        let by_id: HashMap<WatchId, &Evaluation> =
            evaluations.iter().map(|e| (e.watch_id, e)).collect();

        let mut guard = list.lock().await;
        let mut alerts = Vec::new();
        let mut retained = Vec::with_capacity(guard.len());

        for mut watch in guard.drain(..) {
            let Some(evaluation) = by_id.get(&watch.id) else {
                retained.push(watch);
                continue;
            };
            match evaluation.price {
                Some(price) if watch.is_satisfied_by(Some(price)) => {
                    debug!("Watch {} triggered at {}", watch.id, price);
                    alerts.push(Alert {
                        owner_id: watch.owner_id.clone(),
                        source_url: watch.source_url.clone(),
                        price,
                        target_price: watch.target_price,
                        triggered_at: evaluation.checked_at,
                    });
                }
                price => {
                    watch.last_seen_price = price;
                    watch.last_checked_at = Some(evaluation.checked_at);
                    retained.push(watch);
                }
            }
        }

        let emptied = retained.is_empty();
        *guard = retained;
        drop(guard);

        if emptied {
            self.prune_if_empty(owner).await;
        }
        alerts
    }
}
