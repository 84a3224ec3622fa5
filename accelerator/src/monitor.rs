use crate::{
    client::AccelerationClient,
    model::{Acceleration, PoolId},
    outcome::FetchOutcome,
};
use itertools::Itertools;
use mempool_core::{
    debug, info,
    log::STATS_KEYWORD,
    task::tick::{TickReason, TickService},
    time::unix_now_secs,
    trace,
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
    time::Duration,
};
use tokio::task::JoinHandle;

const MONITOR: &str = "acceleration-monitor";

/// Summary of the active accelerations seen by one poll
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccelerationSnapshot {
    txids: BTreeSet<String>,
    pool_counts: BTreeMap<PoolId, usize>,
    oldest_added: Option<u64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SnapshotDelta {
    pub added: usize,
    pub removed: usize,
}

impl AccelerationSnapshot {
    pub fn new(accelerations: &[Acceleration]) -> Self {
        let txids = accelerations.iter().map(|x| x.txid.clone()).collect();
        // A pool listed twice for the same transaction is counted once
        let pool_counts = accelerations.iter().filter_map(|x| x.pools.as_ref()).flat_map(|pools| pools.iter().unique()).counts();
        let oldest_added = accelerations.iter().map(|x| x.added).min();
        Self { txids, pool_counts: pool_counts.into_iter().map(|(pool, count)| (*pool, count)).collect(), oldest_added }
    }

    pub fn active(&self) -> usize {
        self.txids.len()
    }

    /// Number of active accelerations credited to each pool
    pub fn pool_counts(&self) -> &BTreeMap<PoolId, usize> {
        &self.pool_counts
    }

    /// Age in seconds of the oldest active acceleration
    pub fn oldest_age(&self, now_secs: u64) -> Option<u64> {
        self.oldest_added.map(|added| now_secs.saturating_sub(added))
    }

    pub fn delta(&self, previous: &AccelerationSnapshot) -> SnapshotDelta {
        SnapshotDelta {
            added: self.txids.difference(&previous.txids).count(),
            removed: previous.txids.difference(&self.txids).count(),
        }
    }
}

/// Periodically polls the active accelerations and logs a summary of them
pub struct AccelerationMonitor {
    client: Arc<AccelerationClient>,

    interval: Duration,

    // Tick service
    tick_service: Arc<TickService>,
}

impl AccelerationMonitor {
    pub fn new(client: Arc<AccelerationClient>, interval: Duration, tick_service: Arc<TickService>) -> AccelerationMonitor {
        AccelerationMonitor { client, interval, tick_service }
    }

    pub async fn worker(self: &Arc<AccelerationMonitor>) {
        let mut last_snapshot: Option<AccelerationSnapshot> = None;
        loop {
            match self.client.fetch_accelerations().await {
                FetchOutcome::Disabled => {
                    info!("Acceleration service integration is disabled, {} is exiting", MONITOR);
                    break;
                }
                // Already reported by the client, keep the previous snapshot
                FetchOutcome::Unavailable => {}
                FetchOutcome::Fetched(accelerations) => {
                    let snapshot = AccelerationSnapshot::new(&accelerations);
                    let oldest_age = snapshot.oldest_age(unix_now_secs()).unwrap_or_default();
                    debug!("{STATS_KEYWORD}, {}, {}, {}", snapshot.active(), snapshot.pool_counts().len(), oldest_age);

                    if last_snapshot.as_ref() != Some(&snapshot) {
                        let delta = match &last_snapshot {
                            Some(last) => snapshot.delta(last),
                            None => SnapshotDelta { added: snapshot.active(), removed: 0 },
                        };
                        info!(
                            "Acceleration stats: {} active across {} pools ({} added, {} removed, oldest added {}s ago)",
                            snapshot.active(),
                            snapshot.pool_counts().len(),
                            delta.added,
                            delta.removed,
                            oldest_age,
                        );
                        debug!("Active accelerations per pool: {:?}", snapshot.pool_counts());
                    }
                    last_snapshot = Some(snapshot);
                }
            }

            if let TickReason::Shutdown = self.tick_service.tick(self.interval).await {
                break;
            }
        }

        trace!("{} thread exiting", MONITOR);
    }

    pub fn start(self: &Arc<AccelerationMonitor>) -> JoinHandle<()> {
        trace!("starting {}", MONITOR);
        let monitor = self.clone();
        tokio::spawn(async move { monitor.worker().await })
    }
}
