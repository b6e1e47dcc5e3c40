use std::{
    collections::HashSet,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use tokio::time::{sleep, Duration};
use tracing::{debug, info};

use crate::external::AssetFetcher;

pub const BATCH_SIZE: usize = 50;
pub const BATCH_DELAY: Duration = Duration::from_millis(100);
pub const INITIAL_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefetchTarget {
    pub id: String,
    pub priority: bool,
}

/// Progress of one scheduled prefetch run. Failed fetches count as loaded.
#[derive(Debug, Default)]
pub struct PrefetchProgress {
    total: usize,
    loaded: AtomicUsize,
    failed: AtomicUsize,
}

impl PrefetchProgress {
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn loaded(&self) -> usize {
        self.loaded.load(Ordering::Relaxed)
    }

    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::Relaxed)
    }
}

/// Warms asset caches in bounded batches.
#[derive(Clone)]
pub struct PrefetchScheduler {
    fetcher: Arc<dyn AssetFetcher>,
}

impl PrefetchScheduler {
    pub fn new(fetcher: Arc<dyn AssetFetcher>) -> Self {
        PrefetchScheduler { fetcher }
    }

    /// Starts prefetching `targets` in the background and returns immediately.
    ///
    /// After [`INITIAL_DELAY`], ids are issued in batches of [`BATCH_SIZE`], each
    /// batch's fetches running concurrently, with [`BATCH_DELAY`] between batches.
    /// A batch is not awaited before the next one is issued.
    pub fn schedule(&self, targets: Vec<PrefetchTarget>) -> Arc<PrefetchProgress> {
        let order = dispatch_order(&targets);
        let progress = Arc::new(PrefetchProgress {
            total: order.len(),
            ..Default::default()
        });

        let fetcher = Arc::clone(&self.fetcher);
        let run_progress = Arc::clone(&progress);
        tokio::spawn(async move {
            Self::run(fetcher, order, run_progress).await;
        });

        progress
    }

    async fn run(fetcher: Arc<dyn AssetFetcher>, order: Vec<String>, progress: Arc<PrefetchProgress>) {
        if order.is_empty() {
            return;
        }
        info!(assets = order.len(), "scheduling asset prefetch");
        sleep(INITIAL_DELAY).await;

        for (n, batch) in order.chunks(BATCH_SIZE).enumerate() {
            debug!(batch = n, size = batch.len(), "issuing prefetch batch");
            for id in batch {
                let fetcher = Arc::clone(&fetcher);
                let progress = Arc::clone(&progress);
                let id = id.clone();
                tokio::spawn(async move {
                    if let Err(e) = fetcher.fetch(&id).await {
                        debug!(%id, error = %e, "prefetch failed");
                        progress.failed.fetch_add(1, Ordering::Relaxed);
                    }
                    progress.loaded.fetch_add(1, Ordering::Relaxed);
                });
            }
            sleep(BATCH_DELAY).await;
        }
        info!(
            issued = order.len(),
            loaded = progress.loaded(),
            failed = progress.failed(),
            "all prefetch batches issued"
        );
    }
}

/// Priority ids first, then the rest, each in the given order and without duplicates.
pub fn dispatch_order(targets: &[PrefetchTarget]) -> Vec<String> {
    let priority = targets.iter().filter(|t| t.priority);
    let rest = targets.iter().filter(|t| !t.priority);

    let mut seen = HashSet::new();
    priority
        .chain(rest)
        .filter(|t| seen.insert(t.id.as_str()))
        .map(|t| t.id.clone())
        .collect()
}
