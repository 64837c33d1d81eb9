//! A single pending-timer slot.
//!
//! Arming the slot replaces whatever was pending, so at most one deadline exists at a time.
//! Every arming gets a fresh [`TimerId`]; a superseded or cancelled arming can never fire.

use chrono::{DateTime, Duration, Utc};

/// Identifies one arming of a [`TimerSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct TimerSlot {
    next_id: u64,
    pending: Option<(TimerId, DateTime<Utc>)>,
}

impl TimerSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the slot to fire `delay` after `now`, cancelling any pending deadline.
    pub fn arm(&mut self, now: DateTime<Utc>, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending = Some((id, now + delay));
        id
    }

    /// Cancel the pending deadline, if any. Returns the cancelled id.
    pub fn cancel(&mut self) -> Option<TimerId> {
        self.pending.take().map(|(id, _)| id)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Fire the pending arming if its deadline is at or before `now`.
    ///
    /// Firing disarms the slot, so each arming fires at most once.
    pub fn fire_if_due(&mut self, now: DateTime<Utc>) -> Option<TimerId> {
        match self.pending {
            Some((id, deadline)) if deadline <= now => {
                self.pending = None;
                Some(id)
            }
            _ => None,
        }
    }
}
