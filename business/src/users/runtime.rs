//! Async driver for the [`UsersController`].
//!
//! The controller hands out tickets; the runtime performs them as tokio tasks in a `JoinSet`
//! and feeds every completion back in the order the responses actually arrive. Between
//! completions it sleeps until the controller's next timer deadline (search commit or status
//! auto-clear), so timers fire without polling.
//!
//! All tasks share one `CancellationToken`: it is cancelled when the session expires or the
//! runtime shuts down. Requests are never cancelled for being superseded by newer ones.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, error};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use userdesk_states::{Clock, SharedClock, TaskHandle, TaskId};

use super::api;
use super::controller::{
    BulkRequest, BulkTicket, FetchTicket, SessionState, UsersController,
};
use super::model::{ActionOutcome, UsersPage};
use crate::transport::{ApiClient, ApiError};

/// A clock that follows tokio's timer, including paused test time.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin_wall: DateTime<Utc>,
    origin: Instant,
}

impl Default for TokioClock {
    fn default() -> Self {
        Self {
            origin_wall: Utc::now(),
            origin: Instant::now(),
        }
    }
}

impl TokioClock {
    pub fn shared() -> SharedClock {
        Arc::new(Self::default())
    }
}

impl Clock for TokioClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed()).unwrap_or_default();
        self.origin_wall + elapsed
    }
}

/// Work the runtime performs for the controller.
#[derive(Debug, Clone)]
pub enum Ticket {
    Fetch(FetchTicket),
    Bulk(BulkTicket),
}

impl From<FetchTicket> for Ticket {
    fn from(ticket: FetchTicket) -> Self {
        Self::Fetch(ticket)
    }
}

impl From<BulkTicket> for Ticket {
    fn from(ticket: BulkTicket) -> Self {
        Self::Bulk(ticket)
    }
}

enum Completion {
    Fetch(FetchTicket, Result<UsersPage, ApiError>),
    Bulk(BulkTicket, Result<ActionOutcome, ApiError>),
    Cancelled(TaskId),
}

pub struct UsersRuntime {
    controller: UsersController,
    client: ApiClient,
    clock: SharedClock,
    tasks: JoinSet<Completion>,
    in_flight: Vec<(tokio::task::Id, TaskHandle)>,
    cancel: CancellationToken,
}

impl UsersRuntime {
    pub fn new(controller: UsersController, client: ApiClient, clock: SharedClock) -> Self {
        Self {
            controller,
            client,
            clock,
            tasks: JoinSet::new(),
            in_flight: Vec::new(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn controller(&self) -> &UsersController {
        &self.controller
    }

    /// Run a controller operation and dispatch the request it asks for, if any.
    ///
    /// ```ignore
    /// runtime.apply(|c| c.set_page(2));
    /// runtime.apply(|c| c.do_bulk(BulkAction::Block));
    /// ```
    pub fn apply<T, F>(&mut self, op: F)
    where
        T: Into<Ticket>,
        F: FnOnce(&mut UsersController) -> Option<T>,
    {
        if let Some(ticket) = op(&mut self.controller) {
            self.dispatch(ticket.into());
        }
    }

    /// Run a controller operation that never needs the network, such as a selection change.
    pub fn update<R>(&mut self, op: impl FnOnce(&mut UsersController) -> R) -> R {
        op(&mut self.controller)
    }

    /// Number of requests still running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Fire due timers now.
    pub fn tick(&mut self) {
        self.apply(UsersController::tick);
    }

    fn dispatch(&mut self, ticket: Ticket) {
        let client = self.client.clone();
        let token = self.cancel.child_token();

        let id = match &ticket {
            Ticket::Fetch(t) => t.id(),
            Ticket::Bulk(t) => t.id(),
        };
        let handle = TaskHandle::new(id, token.clone());

        let task = self.tasks.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => Completion::Cancelled(id),
                completion = perform(client, ticket) => completion,
            }
        });
        self.in_flight.push((task.id(), handle));
    }

    fn complete(&mut self, completion: Completion) {
        let follow_up = match completion {
            Completion::Fetch(ticket, result) => self.controller.finish_load(ticket, result),
            Completion::Bulk(ticket, result) => self.controller.finish_bulk(ticket, result),
            Completion::Cancelled(id) => {
                debug!("Request {}#{} cancelled", id.kind(), id.generation());
                None
            }
        };

        if self.controller.session_state() == SessionState::Expired {
            self.cancel_all();
            return;
        }
        if let Some(ticket) = follow_up {
            self.dispatch(ticket.into());
        }
    }

    async fn join_one(&mut self) {
        match self.tasks.join_next_with_id().await {
            Some(Ok((task, completion))) => {
                self.in_flight.retain(|(id, _)| *id != task);
                self.complete(completion);
            }
            Some(Err(e)) => {
                error!("Users request task failed: {e}");
                self.in_flight.retain(|(id, _)| *id != e.id());
            }
            None => {}
        }
    }

    /// Wait for one event: a request completion or the next timer deadline.
    ///
    /// Returns `false` when there is nothing left to wait for.
    pub async fn step(&mut self) -> bool {
        let deadline = self.controller.next_deadline();
        if self.tasks.is_empty() && deadline.is_none() {
            return false;
        }

        let wait = deadline
            .map(|at| (at - self.clock.now()).to_std().unwrap_or_default())
            .unwrap_or_default();

        tokio::select! {
            _ = self.join_one(), if !self.tasks.is_empty() => {}
            _ = tokio::time::sleep(wait), if deadline.is_some() => self.tick(),
        }
        true
    }

    /// Wait until no request is in flight and no search edit is waiting to settle.
    ///
    /// A pending status auto-clear does not keep this waiting.
    pub async fn settle(&mut self) {
        while !self.tasks.is_empty() || self.controller.is_search_pending() {
            if !self.step().await {
                break;
            }
        }
    }

    /// Like [`UsersRuntime::settle`], but also lets the status auto-clear fire.
    pub async fn run_until_idle(&mut self) {
        while self.step().await {}
    }

    fn cancel_all(&mut self) {
        for (_, handle) in &self.in_flight {
            debug!("Cancelling request #{}", handle.id().generation());
        }
        self.cancel.cancel();
        self.cancel = CancellationToken::new();
    }

    /// Cancel every outstanding request and wait for the tasks to wind down.
    pub async fn shutdown(&mut self) {
        self.cancel_all();
        while self.tasks.join_next().await.is_some() {}
        self.in_flight.clear();
    }
}

async fn perform(client: ApiClient, ticket: Ticket) -> Completion {
    match ticket {
        Ticket::Fetch(ticket) => {
            let result = api::list_users(&client, ticket.query()).await;
            Completion::Fetch(ticket, result)
        }
        Ticket::Bulk(ticket) => {
            let result = match ticket.request() {
                BulkRequest::Action { action, ids } => {
                    api::bulk_action(&client, *action, ids).await
                }
                BulkRequest::DeleteUnverified => api::delete_unverified(&client).await,
            };
            Completion::Bulk(ticket, result)
        }
    }
}
