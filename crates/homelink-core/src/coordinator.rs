// Copyright (c) 2026 HOMELINK HUB
//
// This file is part of HomeLink.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@homelink-hub.io

//! Periodic polling driver.
//!
//! Stands in for the host's update-coordinator scheduling: a fixed-interval
//! loop that invokes one refresh at a time and keeps a last-good-result
//! cell. A cycle either produces a complete snapshot (replacing the cell
//! wholesale) or fails as a whole, in which case the previous snapshot is
//! retained and the failure is reported to subscribers.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use crossbeam_channel::{Receiver, Sender};
use futures_timer::Delay;
use parking_lot::RwLock;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::error::UpdateError;

/// Default polling period.
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(60);

/// Number of execution slots reserved for blocking device calls.
pub const DEFAULT_EXECUTOR_SLOTS: usize = 2;

/// Channel capacity for published cycle results.
const RESULT_CHANNEL_CAPACITY: usize = 20;

/// One pollable device/connection.
///
/// `poll` runs one full cycle and returns either a complete snapshot or a
/// typed failure. No partial results cross this boundary.
#[async_trait]
pub trait PollSource: Send + Sync + 'static {
    type Snapshot: Clone + Send + Sync + 'static;

    async fn poll(&self) -> Result<Self::Snapshot, UpdateError>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Bounded pool of execution slots for blocking device calls.
///
/// The underlying client libraries block on the network, so their calls are
/// funneled through a small semaphore instead of stalling the cooperative
/// scheduler. A bounded wait abandons the call; the next cycle is the retry
/// mechanism.
#[derive(Debug)]
pub struct ExecutorSlots {
    semaphore: Semaphore,
}

impl ExecutorSlots {
    pub fn new(slots: usize) -> Self {
        Self { semaphore: Semaphore::new(slots) }
    }

    /// Run a call on one slot, waiting for a free slot if necessary.
    pub async fn run<F, T>(&self, fut: F) -> T
    where
        F: Future<Output = T>,
    {
        // The semaphore is never closed, so acquire cannot fail.
        let _permit = self.semaphore.acquire().await.unwrap_or_else(|_| unreachable!());
        fut.await
    }

    /// Run a call on one slot with a deadline.
    ///
    /// On timeout only the pending call is abandoned; the caller decides
    /// whether that aborts the rest of its cycle.
    pub async fn run_with_timeout<F, T>(
        &self,
        label: &str,
        deadline: Duration,
        fut: F,
    ) -> Result<T, UpdateError>
    where
        F: Future<Output = T>,
    {
        self.run(async {
            tokio::time::timeout(deadline, fut).await.map_err(|_| {
                warn!("⏱️ '{label}' exceeded its {}s deadline", deadline.as_secs());
                UpdateError::Timeout { facet: label.to_owned(), secs: deadline.as_secs() }
            })
        })
        .await
    }
}

impl Default for ExecutorSlots {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTOR_SLOTS)
    }
}

/// Fixed-interval driver around a [`PollSource`].
pub struct PollDriver<S: PollSource> {
    source: Arc<S>,
    interval: Duration,
    last_good: RwLock<Option<S::Snapshot>>,
    last_update_success: AtomicBool,
    subscribers: RwLock<Vec<Sender<Result<S::Snapshot, UpdateError>>>>,
    cycle_lock: tokio::sync::Mutex<()>,
}

impl<S: PollSource> std::fmt::Debug for PollDriver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollDriver")
            .field("source", &self.source.name())
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl<S: PollSource> PollDriver<S> {
    pub fn new(source: Arc<S>, interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            source,
            interval,
            last_good: RwLock::new(None),
            last_update_success: AtomicBool::new(false),
            subscribers: RwLock::new(Vec::new()),
            cycle_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Subscribe to per-cycle results (complete snapshot or typed failure).
    pub fn subscribe(&self) -> Receiver<Result<S::Snapshot, UpdateError>> {
        let (tx, rx) = crossbeam_channel::bounded(RESULT_CHANNEL_CAPACITY);
        self.subscribers.write().push(tx);
        rx
    }

    /// Run one cycle now.
    ///
    /// At most one cycle is in flight at any time; concurrent callers are
    /// serialized. On success the last-good cell is replaced wholesale; on
    /// failure it is left untouched.
    pub async fn refresh(&self) -> Result<(), UpdateError> {
        let _guard = self.cycle_lock.lock().await;

        let result = self.source.poll().await;
        match &result {
            Ok(snapshot) => {
                debug!("✅ '{}' produced a complete snapshot", self.source.name());
                *self.last_good.write() = Some(snapshot.clone());
                self.last_update_success.store(true, Ordering::SeqCst);
            }
            Err(e) => {
                error!("❌ '{}' cycle failed: {e}", self.source.name());
                self.last_update_success.store(false, Ordering::SeqCst);
            }
        }

        self.publish(&result);
        result.map(|_| ())
    }

    fn publish(&self, result: &Result<S::Snapshot, UpdateError>) {
        let subscribers = self.subscribers.read();
        for tx in subscribers.iter() {
            if let Err(e) = tx.try_send(result.clone()) {
                warn!("Failed to publish cycle result (buffer full?): {e}");
            }
        }
    }

    /// Last complete snapshot, surviving failed cycles.
    pub fn last_snapshot(&self) -> Option<S::Snapshot> {
        self.last_good.read().clone()
    }

    /// Whether the most recent cycle succeeded.
    pub fn last_update_success(&self) -> bool {
        self.last_update_success.load(Ordering::SeqCst)
    }

    /// Spawn the periodic loop: an immediate first refresh, then one cycle
    /// per interval. Runs until the driver is dropped everywhere else.
    pub fn spawn(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let driver = Arc::clone(self);
        tokio::spawn(async move {
            info!(
                "🚀 Poll driver for '{}' started (interval {}s)",
                driver.source.name(),
                driver.interval.as_secs()
            );

            if let Err(e) = driver.refresh().await {
                warn!("Initial refresh failed: {e}");
            }

            loop {
                Delay::new(driver.interval).await;
                // No automatic retry within a cycle; this tick is the retry.
                if let Err(e) = driver.refresh().await {
                    warn!("Scheduled refresh failed: {e}");
                }
            }
        })
    }
}
