//! TTL-memoized values
//!
//! [`Cached`] holds at most one value together with the instant it was
//! fetched. Reads inside the TTL window return a clone of that value; the
//! first read after expiry fetches again. The fetch runs while the slot lock
//! is held, so concurrent readers wait for the in-flight fetch instead of
//! issuing their own. Readers that waited on a fetch which failed get its
//! error; the next read after that tries again.

use crate::error::{Result, VehicleError};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

struct Entry<T> {
    value: T,
    issued: Instant,
}

struct Slot<T> {
    entry: Option<Entry<T>>,
    failed: Option<VehicleError>,
}

/// A lazily refreshed, single-flight cached value
pub struct Cached<T> {
    ttl: Duration,
    // completed fetches, bumped with the slot lock held
    fetches: AtomicU64,
    slot: Mutex<Slot<T>>,
}

impl<T: Clone> Cached<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            fetches: AtomicU64::new(0),
            slot: Mutex::new(Slot {
                entry: None,
                failed: None,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value, calling `fetch` when empty or expired.
    ///
    /// Errors are handed to the callers that waited on the failed fetch and
    /// are not cached beyond that.
    pub async fn get<F, Fut>(&self, fetch: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let seen = self.fetches.load(Ordering::Acquire);
        let mut slot = self.slot.lock().await;

        if let Some(entry) = slot.entry.as_ref()
            && entry.issued.elapsed() < self.ttl
        {
            return Ok(entry.value.clone());
        }

        // a fetch completed while this caller waited for the lock
        if self.fetches.load(Ordering::Acquire) != seen
            && let Some(err) = slot.failed.as_ref()
        {
            return Err(err.clone());
        }

        let outcome = fetch().await;
        match &outcome {
            Ok(value) => {
                slot.entry = Some(Entry {
                    value: value.clone(),
                    issued: Instant::now(),
                });
                slot.failed = None;
            }
            Err(err) => {
                slot.entry = None;
                slot.failed = Some(err.clone());
            }
        }
        self.fetches.fetch_add(1, Ordering::Release);
        outcome
    }
}
