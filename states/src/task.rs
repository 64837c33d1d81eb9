//! Request generations and cooperative cancellation.
//!
//! - `TaskId`: a task kind plus a generation number, issued by [`Generations`]
//! - `TaskHandle`: wraps a task with its `CancellationToken`
//!
//! Generations let a caller tell whether a completion belongs to the most recently dispatched
//! request of its kind. Whether stale completions are ignored is the caller's policy.

use tokio_util::sync::CancellationToken;

/// Unique identifier for a dispatched task.
///
/// `kind` groups tasks that replace each other (e.g. all list fetches); `generation` grows
/// monotonically within a [`Generations`] counter.
///
/// ```ignore
/// let mut generations = Generations::default();
/// let first = generations.next("fetch");
/// let second = generations.next("fetch");
///
/// assert!(second.generation() > first.generation());
/// assert!(generations.is_latest(second));
/// assert!(!generations.is_latest(first));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId {
    kind: &'static str,
    generation: u64,
}

impl TaskId {
    pub fn new(kind: &'static str, generation: u64) -> Self {
        Self { kind, generation }
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Higher generation values indicate more recently dispatched tasks.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Issues task ids and remembers the latest generation per kind.
#[derive(Debug, Default, Clone)]
pub struct Generations {
    counter: u64,
    latest: Vec<(&'static str, u64)>,
}

impl Generations {
    pub fn next(&mut self, kind: &'static str) -> TaskId {
        self.counter += 1;
        match self.latest.iter_mut().find(|(k, _)| *k == kind) {
            Some(entry) => entry.1 = self.counter,
            None => self.latest.push((kind, self.counter)),
        }
        TaskId::new(kind, self.counter)
    }

    /// Whether `id` is the most recently issued id of its kind.
    pub fn is_latest(&self, id: TaskId) -> bool {
        self.latest
            .iter()
            .any(|(kind, generation)| *kind == id.kind && *generation == id.generation)
    }
}

/// Handle to a dispatched async task with cooperative cancellation support.
///
/// Tasks should race their work against `token.cancelled()`:
///
/// ```ignore
/// tokio::select! {
///     _ = token.cancelled() => None,
///     result = do_request() => Some(result),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct TaskHandle {
    id: TaskId,
    cancel_token: CancellationToken,
}

impl TaskHandle {
    pub fn new(id: TaskId, cancel_token: CancellationToken) -> Self {
        Self { id, cancel_token }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns a clone of the cancellation token for the async work to observe.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Requests cooperative cancellation. The task stops at its next check point.
    pub fn cancel(&self) {
        self.cancel_token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.is_cancelled()
    }
}
