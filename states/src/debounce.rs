//! Debouncer: settles a stream of raw values after a quiet interval.
//!
//! Each pushed value restarts the quiet interval and replaces the pending value, so only the
//! value that survives a full interval is ever emitted. The debouncer holds no business state
//! beyond the last raw and last emitted values.

use chrono::{DateTime, Duration, Utc};

use crate::TimerSlot;

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    timer: TimerSlot,
    pending: Option<T>,
    last_raw: Option<T>,
    last_emitted: Option<T>,
}

impl<T: Clone> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            timer: TimerSlot::new(),
            pending: None,
            last_raw: None,
            last_emitted: None,
        }
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }

    /// Feed a raw value at `now`.
    ///
    /// If the previously pending value is already due at `now`, it settles first and is
    /// returned; its timer and the new value's arrival coincide, and the timer wins.
    pub fn push(&mut self, value: T, now: DateTime<Utc>) -> Option<T> {
        let settled = self.poll(now);
        self.last_raw = Some(value.clone());
        self.pending = Some(value);
        self.timer.arm(now, self.quiet);
        settled
    }

    /// Emit the pending value if its quiet interval has elapsed at `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<T> {
        self.timer.fire_if_due(now)?;
        let value = self.pending.take()?;
        self.last_emitted = Some(value.clone());
        Some(value)
    }

    /// Drop the pending value without emitting it.
    pub fn cancel(&mut self) {
        self.timer.cancel();
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value will settle, if there is one.
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.timer.deadline()
    }

    pub fn last_raw(&self) -> Option<&T> {
        self.last_raw.as_ref()
    }

    pub fn last_emitted(&self) -> Option<&T> {
        self.last_emitted.as_ref()
    }
}
