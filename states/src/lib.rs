//! Time-driven state primitives shared by the userdesk crates.
//!
//! Nothing in here knows about users or HTTP. The business layer composes these pieces:
//! - [`Clock`] so every timer can be driven by a [`ManualClock`] in tests
//! - [`TimerSlot`], a single pending deadline that can be re-armed or cancelled
//! - [`Debouncer`], which turns a stream of raw values into settled values
//! - [`TaskId`] / [`TaskHandle`] for request generations and cooperative cancellation
//! - [`StateUpdater`] / [`StateReader`], a typed channel for publishing state transitions

mod clock;
mod debounce;
mod error;
mod state;
mod task;
mod timer;

pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use debounce::Debouncer;
pub use error::Error;
pub use state::{StateReader, StateUpdater, state_channel};
pub use task::{Generations, TaskHandle, TaskId};
pub use timer::{TimerId, TimerSlot};
