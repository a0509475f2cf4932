//! The freshness-aware refresh coordinator.
//!
//! [`LiveSource`] decides, on every read, whether the cached dataset is
//! fresh enough to serve immediately, whether a background refresh should
//! be kicked off, or whether the caller must block until a refresh
//! completes:
//!
//! - staleness <= soft threshold: serve the snapshot, touch nothing.
//! - soft < staleness <= hard: serve the snapshot and spawn a background
//!   refresh unless one is already in flight.
//! - staleness > hard (including "never refreshed"): block on the refresh
//!   completion signal, re-validating staleness after every wake, until
//!   the data is acceptable or the caller's deadline expires.
//!
//! # Lock discipline
//!
//! The dataset, the completion timestamp, and the in-flight flag form one
//! logical piece of state behind a single mutex. Checking staleness,
//! deciding to launch, and setting the flag happen atomically with respect
//! to other readers, which is what bounds the system to one refresh in
//! flight process-wide. The lock is never held across network I/O or any
//! await point: a slow upstream can delay a blocked reader, but it can
//! never stop other readers from being served the cached snapshot.
//!
//! # Completion signal
//!
//! A [`Notify`] tied to the mutex-guarded state replaces a classic
//! condition variable. Waiters arm the notification *before* re-checking
//! the condition so a completion occurring between the check and the await
//! cannot be missed. The background task wakes all waiters on success and
//! on failure alike; a waiter that finds the data still too stale simply
//! re-triggers, so one failed attempt never strands it.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use gbfs_types::Dataset;

use crate::client::FeedClient;
use crate::config::{ConfigError, FeedConfig};
use crate::error::FeedError;
use crate::fetch::fetch_both;
use crate::store::Store;

/// Anything that can produce the complete station dataset.
///
/// This is the contract the presentation layers consume. [`LiveSource`]
/// implements it with the staleness state machine;
/// [`FixtureSource`](crate::fixture::FixtureSource) implements it from
/// local files for tests and offline development.
pub trait StationSource {
    /// Return the complete-only dataset, refreshing first if required.
    ///
    /// `deadline` bounds any synchronous wait; `None` waits indefinitely.
    fn get_all_stations(
        &self,
        deadline: Option<Instant>,
    ) -> impl Future<Output = Result<Dataset, FeedError>> + Send;
}

/// Staleness thresholds, validated so that `soft < hard`.
#[derive(Debug, Clone, Copy)]
struct Thresholds {
    /// Above this, a background refresh is requested.
    soft: Duration,
    /// Above this, readers block for a refresh.
    hard: Duration,
}

/// State guarded by the single coordinator mutex.
///
/// The dataset and timestamp (inside the store) and the in-flight flag
/// must only ever be read or written together; splitting them across
/// locks would let a reader base its refresh decision on half-updated
/// state.
#[derive(Debug, Default)]
struct Shared {
    store: Store,
    update_in_flight: bool,
}

struct Inner<C> {
    client: C,
    thresholds: Thresholds,
    shared: Mutex<Shared>,
    refresh_done: Notify,
}

/// Live data source pulling from the upstream feed on demand.
///
/// Cheap to clone; clones share the same cache and refresh coordination.
pub struct LiveSource<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for LiveSource<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Inner<C> {
    /// Acquire the shared state lock.
    ///
    /// A poisoned lock means a panic happened inside a critical section
    /// that only moves plain data between collections; the state is still
    /// coherent, so the poison is ignored rather than propagated.
    fn lock_shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: FeedClient> Inner<C> {
    /// Spawn a background refresh unless one is already in flight.
    ///
    /// Must be called with the shared lock held (`shared` is the guarded
    /// state); this is what makes check-and-set of the in-flight flag
    /// atomic across concurrent readers.
    fn start_update_locked(this: &Arc<Self>, shared: &mut Shared) {
        if shared.update_in_flight {
            return;
        }
        shared.update_in_flight = true;

        let inner = Arc::clone(this);
        tokio::spawn(async move {
            // Network I/O happens without the lock.
            let outcome = fetch_both(&inner.client).await;

            let mut shared = inner.lock_shared();
            match outcome {
                Ok((status, info)) => {
                    shared.store.integrate(status, info);
                    debug!("feed refresh integrated");
                }
                Err(error) => {
                    // Swallowed: the previous (possibly stale) snapshot
                    // remains servable, and waiters re-trigger on wake.
                    warn!(%error, "feed refresh failed; keeping cached data");
                }
            }
            shared.update_in_flight = false;
            drop(shared);

            // Wake all waiters on success and failure alike so they
            // re-evaluate staleness instead of hanging on one attempt.
            inner.refresh_done.notify_waiters();
        });
    }
}

impl<C: FeedClient> LiveSource<C> {
    /// Create a live source from a feed client and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThresholds`] unless the configured
    /// soft threshold is strictly below the hard threshold.
    pub fn new(client: C, config: &FeedConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                client,
                thresholds: Thresholds {
                    soft: config.soft_threshold(),
                    hard: config.hard_threshold(),
                },
                shared: Mutex::new(Shared::default()),
                refresh_done: Notify::new(),
            }),
        })
    }

    /// Return the complete-only dataset, refreshing first if staleness
    /// requires it.
    ///
    /// Incomplete stations are skipped from the snapshot and logged.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::DeadlineExceeded`] if `deadline` expires while
    /// the caller is blocked waiting for a refresh. Refresh failures are
    /// never surfaced here.
    pub async fn get_all_stations(
        &self,
        deadline: Option<Instant>,
    ) -> Result<Dataset, FeedError> {
        let started = Instant::now();
        debug!("station snapshot requested");

        self.maybe_refresh(deadline).await?;

        let (dataset, skipped) = {
            let shared = self.inner.lock_shared();
            shared.store.snapshot()
        };
        for id in &skipped {
            warn!(station_id = %id, "station is missing either status or information; skipped");
        }

        debug!(stations = dataset.len(), elapsed = ?started.elapsed(), "station snapshot served");
        Ok(dataset)
    }

    /// Eagerly warm the cache, failing fast if the upstream is not
    /// reachable within `timeout`.
    ///
    /// Used as the startup self-check so a process does not begin serving
    /// before the first successful pull.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::DeadlineExceeded`] if no refresh completes in
    /// time.
    pub async fn self_check(&self, timeout: Duration) -> Result<(), FeedError> {
        let deadline = Instant::now().checked_add(timeout);
        self.get_all_stations(deadline).await.map(|_| ())
    }

    /// Elapsed time since the last successful refresh, or `None` if no
    /// refresh has completed yet.
    pub fn staleness(&self) -> Option<Duration> {
        self.inner.lock_shared().store.staleness(Instant::now())
    }

    /// Run the staleness state machine, blocking only in the too-stale
    /// band.
    async fn maybe_refresh(&self, deadline: Option<Instant>) -> Result<(), FeedError> {
        // Fresh and stale-but-servable bands: one lock acquisition, no
        // suspension.
        {
            let mut shared = self.inner.lock_shared();
            match shared.store.staleness(Instant::now()) {
                Some(age) if age <= self.inner.thresholds.soft => return Ok(()),
                Some(age) if age <= self.inner.thresholds.hard => {
                    debug!(staleness = ?age, "requesting background refresh");
                    Inner::start_update_locked(&self.inner, &mut shared);
                    return Ok(());
                }
                // Too stale, or never refreshed: fall through to the wait
                // loop below.
                _ => {}
            }
        }

        loop {
            // Arm the waiter before re-checking the condition so a
            // completion between the check and the await is not missed.
            let notified = self.inner.refresh_done.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut shared = self.inner.lock_shared();
                let staleness = shared.store.staleness(Instant::now());
                match staleness {
                    Some(age) if age <= self.inner.thresholds.hard => return Ok(()),
                    _ => {
                        info!(staleness = ?staleness, "waiting synchronously for refresh");
                        Inner::start_update_locked(&self.inner, &mut shared);
                    }
                }
            }

            match deadline {
                Some(at) => {
                    if tokio::time::timeout_at(at, notified).await.is_err() {
                        // The refresh itself keeps running in the
                        // background and will serve future callers.
                        return Err(FeedError::DeadlineExceeded);
                    }
                }
                None => notified.await,
            }
        }
    }
}

impl<C: FeedClient> StationSource for LiveSource<C> {
    async fn get_all_stations(&self, deadline: Option<Instant>) -> Result<Dataset, FeedError> {
        // Delegates to the inherent method (which takes priority in
        // method resolution).
        self.get_all_stations(deadline).await
    }
}
