//! Status Channel: the single transient message shown above the user list.
//!
//! States are `Idle`, `Loading`, `Success` and `Error`. `Success` and `Error` revert to idle
//! after a fixed delay through one [`TimerSlot`]; any later [`StatusChannel::set`] cancels that
//! pending revert, so a superseded status leaves no trace.
//!
//! Every visible transition is published to subscribers, in order.

use chrono::Duration;
use log::debug;
use userdesk_states::{SharedClock, StateReader, StateUpdater, TimerSlot, state_channel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusKind {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl StatusKind {
    /// Whether this kind reverts to idle on its own.
    pub fn auto_clears(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

impl Status {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn loading(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Loading,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.kind == StatusKind::Idle
    }

    /// Only non-idle statuses with text are rendered.
    pub fn is_visible(&self) -> bool {
        !self.is_idle() && !self.text.is_empty()
    }
}

pub struct StatusChannel {
    clock: SharedClock,
    clear_delay: Duration,
    current: Status,
    auto_clear: TimerSlot,
    subscribers: Vec<StateUpdater<Status>>,
}

impl std::fmt::Debug for StatusChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusChannel")
            .field("current", &self.current)
            .field("clear_at", &self.auto_clear.deadline())
            .finish()
    }
}

impl StatusChannel {
    pub fn new(clock: SharedClock, clear_delay: Duration) -> Self {
        Self {
            clock,
            clear_delay,
            current: Status::idle(),
            auto_clear: TimerSlot::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn current(&self) -> &Status {
        &self.current
    }

    /// Replace the status now, cancelling any pending auto-clear.
    pub fn set(&mut self, next: Status) {
        self.auto_clear.cancel();
        if next.kind.auto_clears() {
            self.auto_clear.arm(self.clock.now(), self.clear_delay);
        }
        self.publish(next);
    }

    /// Go back to idle without arming anything. No-op when already idle.
    pub fn reset(&mut self) {
        self.auto_clear.cancel();
        if !self.current.is_idle() || !self.current.text.is_empty() {
            self.publish(Status::idle());
        }
    }

    /// Apply a due auto-clear. Returns whether the status changed.
    pub fn tick(&mut self) -> bool {
        if self.auto_clear.fire_if_due(self.clock.now()).is_none() {
            return false;
        }
        debug!("Status auto-cleared: {:?}", self.current.kind);
        self.publish(Status::idle());
        true
    }

    /// When the pending auto-clear fires, if one is armed.
    pub fn next_deadline(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        self.auto_clear.deadline()
    }

    /// Observe every future status transition.
    pub fn subscribe(&mut self) -> StateReader<Status> {
        let (updater, reader) = state_channel();
        self.subscribers.push(updater);
        reader
    }

    fn publish(&mut self, next: Status) {
        self.current = next;
        let current = &self.current;
        self.subscribers
            .retain(|subscriber| subscriber.set(current.clone()).is_ok());
    }
}
