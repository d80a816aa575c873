//! Per-dish trailing-edge debounce of claim writes.
//!
//! Every keystroke in a dish's claim field reschedules that dish's timer; only
//! when the field has been quiet for the configured delay does the write run.
//! Timers are keyed by [`DishId`], so editing one dish never delays another.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::domain::types::DishId;

/// Default quiet period before a claim is persisted.
pub const DEFAULT_CLAIM_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug)]
struct PendingClaim {
    ticket: u64,
    handle: JoinHandle<()>,
}

type PendingMap = Arc<Mutex<HashMap<DishId, PendingClaim>>>;

fn lock(pending: &PendingMap) -> MutexGuard<'_, HashMap<DishId, PendingClaim>> {
    pending.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cancelable claim-write timers keyed by dish.
#[derive(Debug)]
pub struct ClaimDebouncer {
    delay: Duration,
    pending: PendingMap,
    next_ticket: AtomicU64,
}

impl ClaimDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Arc::default(),
            next_ticket: AtomicU64::new(0),
        }
    }

    /// Replaces the pending timer of `dish_id` with a new one running `write`.
    ///
    /// `write` is not polled until the timer fires, so it observes state as of
    /// fire time. Once fired, the write is no longer cancelable through this
    /// debouncer. Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, dish_id: DishId, write: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed) + 1;
        let delay = self.delay;
        let pending = Arc::clone(&self.pending);
        let key = dish_id.clone();

        // Held across the spawn so the timer cannot look itself up before it
        // has been registered.
        let mut guard = lock(&self.pending);
        if let Some(previous) = guard.remove(&dish_id) {
            previous.handle.abort();
            log::debug!("Rescheduled claim write for dish {dish_id}");
        }

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let fired = {
                let mut map = lock(&pending);
                match map.get(&key) {
                    Some(current) if current.ticket == ticket => {
                        map.remove(&key);
                        true
                    }
                    _ => false,
                }
            };

            if fired {
                write.await;
            }
        });

        guard.insert(dish_id, PendingClaim { ticket, handle });
    }

    /// Cancels the pending timer of `dish_id`, returning whether one existed.
    pub fn cancel(&self, dish_id: &DishId) -> bool {
        match lock(&self.pending).remove(dish_id) {
            Some(claim) => {
                claim.handle.abort();
                true
            }
            None => false,
        }
    }

    /// Cancels every pending timer and returns how many were cancelled.
    pub fn cancel_all(&self) -> usize {
        let drained = lock(&self.pending).drain().collect::<Vec<_>>();
        for (_, claim) in &drained {
            claim.handle.abort();
        }
        drained.len()
    }

    pub fn is_pending(&self, dish_id: &DishId) -> bool {
        lock(&self.pending).contains_key(dish_id)
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }
}

impl Default for ClaimDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_CLAIM_DELAY)
    }
}

impl Drop for ClaimDebouncer {
    fn drop(&mut self) {
        let cancelled = self.cancel_all();
        if cancelled > 0 {
            log::debug!("Abandoned {cancelled} pending claim writes on teardown");
        }
    }
}
