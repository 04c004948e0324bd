//! Single-threaded virtual-time scheduler.
//!
//! A sorted delay queue over a millisecond clock that only moves when the
//! caller advances it. Nothing here sleeps or spawns; tests fast-forward time
//! by calling [`Scheduler::advance`], and a front end maps real time onto the
//! clock by advancing with wall-clock deltas.
//!
//! ## Usage
//!
//! ```
//! use pmfcheck_core::scheduler::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! let id = scheduler.schedule(2_000, "reveal");
//! assert!(scheduler.advance(1_999).is_empty());
//! let fired = scheduler.advance(1);
//! assert_eq!(fired[0].id, id);
//! assert_eq!(fired[0].due_ms, 2_000);
//! ```

use serde::{Deserialize, Serialize};

/// Handle returned by `schedule*`, used to cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerId(u64);

/// A timer that came due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    /// Virtual time at which it was due (the clock reads this value while the
    /// fire is handled).
    pub due_ms: u64,
    pub payload: T,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TimerId,
    due_ms: u64,
    /// Tie-breaker: timers due at the same instant fire in scheduling order.
    seq: u64,
    period_ms: Option<u64>,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now_ms: u64,
    next_id: u64,
    next_seq: u64,
    /// Kept sorted by `(due_ms, seq)`.
    queue: Vec<Entry<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            next_seq: 0,
            queue: Vec::new(),
        }
    }
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn next_due_ms(&self) -> Option<u64> {
        self.queue.first().map(|e| e.due_ms)
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.queue.iter().any(|e| e.id == id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Fire once, `delay_ms` after the current instant.
    pub fn schedule(&mut self, delay_ms: u64, payload: T) -> TimerId {
        self.arm(delay_ms, None, payload)
    }

    /// Fire every `period_ms` until cancelled. A zero period is treated as 1 ms.
    pub fn schedule_repeating(&mut self, period_ms: u64, payload: T) -> TimerId {
        let period = period_ms.max(1);
        self.arm(period, Some(period), payload)
    }

    /// Returns `false` when the timer already fired or was never armed.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|e| e.id != id);
        self.queue.len() != before
    }

    /// Cancel every armed timer.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Pop the earliest timer due at or before `deadline_ms`, moving the clock
    /// to its due time. Repeating timers are re-armed one period later.
    ///
    /// Callers that schedule new timers while handling a fire should drain with
    /// this and then call [`Scheduler::settle_at`], so that timers armed during
    /// the window still fire within it.
    pub fn pop_due(&mut self, deadline_ms: u64) -> Option<Fired<T>> {
        if self.queue.first()?.due_ms > deadline_ms {
            return None;
        }
        let entry = self.queue.remove(0);
        self.now_ms = self.now_ms.max(entry.due_ms);

        let payload = match entry.period_ms {
            Some(period) => {
                let payload = entry.payload.clone();
                let seq = self.bump_seq();
                self.insert(Entry {
                    id: entry.id,
                    due_ms: entry.due_ms.saturating_add(period),
                    seq,
                    period_ms: Some(period),
                    payload: entry.payload,
                });
                payload
            }
            None => entry.payload,
        };

        Some(Fired {
            id: entry.id,
            due_ms: entry.due_ms,
            payload,
        })
    }

    /// Move the clock forward to `deadline_ms` (never backwards).
    pub fn settle_at(&mut self, deadline_ms: u64) {
        self.now_ms = self.now_ms.max(deadline_ms);
    }

    /// Advance the clock by `elapsed_ms`, returning every fire in due order.
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<Fired<T>> {
        let deadline = self.now_ms.saturating_add(elapsed_ms);
        let mut fired = Vec::new();
        while let Some(f) = self.pop_due(deadline) {
            fired.push(f);
        }
        self.settle_at(deadline);
        fired
    }

    /// Jump straight to the next armed timer and fire it.
    pub fn advance_to_next(&mut self) -> Option<Fired<T>> {
        let due = self.next_due_ms()?;
        self.pop_due(due)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn arm(&mut self, delay_ms: u64, period_ms: Option<u64>, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.insert(Entry {
            id,
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq,
            period_ms,
            payload,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn insert(&mut self, entry: Entry<T>) {
        let key = (entry.due_ms, entry.seq);
        let at = self.queue.partition_point(|e| (e.due_ms, e.seq) <= key);
        self.queue.insert(at, entry);
    }
}
