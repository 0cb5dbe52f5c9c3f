use std::{collections::VecDeque, sync::Arc};

use chrono::{DateTime, TimeDelta, Utc};
use dashmap::{mapref::one::Ref, DashMap};
use parking_lot::Mutex;

use super::clock::{Clock, SystemClock};

/// Timestamps of accepted requests for one client, oldest first.
#[derive(Debug, Default)]
struct RequestLog {
    accepted: VecDeque<DateTime<Utc>>,
}

impl RequestLog {
    /// Drop every entry at or before `cutoff`.
    fn prune(&mut self, cutoff: DateTime<Utc>) {
        self.accepted.retain(|at| *at > cutoff);
    }

    /// Clock rollback can leave the deque out of order, so scan instead of
    /// trusting the front.
    fn oldest(&self) -> Option<DateTime<Utc>> {
        self.accepted.iter().min().copied()
    }

    fn has_entries_after(&self, cutoff: DateTime<Utc>) -> bool {
        self.accepted.iter().any(|at| *at > cutoff)
    }
}

/// Sliding-window log limiter keyed by client identifier.
///
/// Each identifier owns a mutex-guarded log so the prune/check/record
/// sequence is atomic per client, while different clients only share
/// DashMap's shard locks. Expired entries are pruned lazily on the next
/// admission check for that client.
#[derive(Clone)]
pub struct SlidingWindowLimiter {
    logs: Arc<DashMap<String, Mutex<RequestLog>>>,
    clock: Arc<dyn Clock>,
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl SlidingWindowLimiter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            logs: Arc::new(DashMap::new()),
            clock,
        }
    }

    /// Shard read guard for `identifier`, creating an empty log on first use.
    ///
    /// Callers lock the inner mutex while still holding the guard, which keeps
    /// `purge_idle` from detaching a log that is mid-update.
    fn log_for(&self, identifier: &str) -> Ref<'_, String, Mutex<RequestLog>> {
        match self.logs.get(identifier) {
            Some(existing) => existing,
            None => self
                .logs
                .entry(identifier.to_string())
                .or_default()
                .downgrade(),
        }
    }

    /// Admit the request if fewer than `max_requests` accepted requests fall
    /// inside the trailing `window`. Only admitted requests are recorded.
    pub fn is_allowed(&self, identifier: &str, max_requests: usize, window: TimeDelta) -> bool {
        let now = self.clock.now();
        let entry = self.log_for(identifier);
        let mut log = entry.lock();

        if let Some(cutoff) = now.checked_sub_signed(window) {
            log.prune(cutoff);
        }

        if log.accepted.len() < max_requests {
            log.accepted.push_back(now);
            true
        } else {
            tracing::warn!(identifier, max_requests, "Rate limit exceeded");
            false
        }
    }

    /// Quota left for `identifier`, counting every tracked entry.
    pub fn remaining(&self, identifier: &str, max_requests: usize) -> usize {
        let tracked = self
            .logs
            .get(identifier)
            .map(|entry| entry.lock().accepted.len())
            .unwrap_or(0);

        max_requests.saturating_sub(tracked)
    }

    /// Instant at which the oldest tracked entry leaves the window.
    pub fn reset_time(&self, identifier: &str, window: TimeDelta) -> Option<DateTime<Utc>> {
        let oldest = self.logs.get(identifier)?.lock().oldest()?;
        oldest.checked_add_signed(window)
    }

    /// Forget identifiers with nothing left inside `window`. Returns how many
    /// were dropped.
    pub fn purge_idle(&self, window: TimeDelta) -> usize {
        let Some(cutoff) = self.clock.now().checked_sub_signed(window) else {
            return 0;
        };

        let mut purged = 0;
        self.logs.retain(|_, log| {
            let keep = log.get_mut().has_entries_after(cutoff);
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    pub fn tracked_identifiers(&self) -> usize {
        self.logs.len()
    }
}
