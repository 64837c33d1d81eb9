//! List Controller.
//!
//! Owns the query parameters, the displayed page, the row selection and the status line of the
//! user-management view. It never performs IO: every operation that needs the network returns
//! a ticket describing the request, and the caller reports the outcome back through
//! [`UsersController::finish_load`] / [`UsersController::finish_bulk`]. Between the two the
//! controller keeps accepting input, which is exactly the "suspend at the network boundary"
//! model of the console.
//!
//! Rules:
//! - a committed change of page, page size or stabilized search term issues a non-silent load
//! - changing page size or search text resets the page to 1 and clears the selection
//! - a successful load replaces items and total and clears the selection
//! - any `401` ends the session: token cleared, no status text, further input ignored
//!
//! Completion ordering follows [`FetchOrdering`].

use log::{debug, info, warn};
use userdesk_states::{Debouncer, Generations, SharedClock, StateReader, TaskId};

use super::model::{ActionOutcome, BulkAction, UserId, UserSummary, UsersPage};
use super::query::{PageSize, QueryParams, pages_count};
use super::selection::Selection;
use crate::config::{BusinessConfig, FetchOrdering};
use crate::route::Route;
use crate::session::SessionStore;
use crate::status::{Status, StatusChannel};
use crate::transport::ApiError;

pub const LOADING_TEXT: &str = "Loading...";
pub const WORKING_TEXT: &str = "Working...";
pub const LOAD_ERROR_TEXT: &str = "Load error";
pub const ACTION_ERROR_TEXT: &str = "Action error";
pub const SELECT_FIRST_TEXT: &str = "Select users first";
pub const DONE_TEXT: &str = "Done.";

const FETCH_KIND: &str = "fetch";
const BULK_KIND: &str = "bulk";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Active,
    /// The service rejected the credential; the view must go back to login.
    Expired,
}

/// A list fetch the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    id: TaskId,
    query: QueryParams,
    silent: bool,
}

impl FetchTicket {
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Parameters as they stood at dispatch time.
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkRequest {
    Action { action: BulkAction, ids: Vec<UserId> },
    DeleteUnverified,
}

/// A mutation the caller must perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkTicket {
    id: TaskId,
    request: BulkRequest,
}

impl BulkTicket {
    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn request(&self) -> &BulkRequest {
        &self.request
    }
}

pub struct UsersController {
    clock: SharedClock,
    status: StatusChannel,
    search: Debouncer<String>,
    query: QueryParams,
    items: Vec<UserSummary>,
    total: u64,
    selection: Selection,
    generations: Generations,
    ordering: FetchOrdering,
    session_state: SessionState,
    session: SessionStore,
}

impl std::fmt::Debug for UsersController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersController")
            .field("query", &self.query)
            .field("items", &self.items.len())
            .field("total", &self.total)
            .field("selected", &self.selection.len())
            .field("status", self.status.current())
            .field("session_state", &self.session_state)
            .finish()
    }
}

impl UsersController {
    pub fn new(
        config: &BusinessConfig,
        session: SessionStore,
        clock: SharedClock,
    ) -> Self {
        let session_state = if session.is_logged_in() {
            SessionState::Active
        } else {
            SessionState::Expired
        };

        Self {
            status: StatusChannel::new(clock.clone(), config.status_clear_delay()),
            search: Debouncer::new(config.search_debounce()),
            clock,
            query: QueryParams::new(config.default_page_size),
            items: Vec::new(),
            total: 0,
            selection: Selection::default(),
            generations: Generations::default(),
            ordering: config.fetch_ordering,
            session_state,
            session,
        }
    }

    /// Start from explicit parameters instead of page 1 with no search.
    pub fn with_query(mut self, query: QueryParams) -> Self {
        self.query = QueryParams {
            page: query.page.max(1),
            ..query
        };
        self
    }

    // ---- accessors ----

    pub fn items(&self) -> &[UserSummary] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn pages_count(&self) -> u32 {
        pages_count(self.total, self.query.page_size)
    }

    pub fn selected(&self) -> &[UserId] {
        self.selection.ids()
    }

    pub fn is_selected(&self, id: &UserId) -> bool {
        self.selection.contains(id)
    }

    pub fn status(&self) -> &Status {
        self.status.current()
    }

    pub fn subscribe_status(&mut self) -> StateReader<Status> {
        self.status.subscribe()
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Raw text of the search box, which may not have settled yet.
    pub fn search_text(&self) -> &str {
        self.search
            .last_raw()
            .map_or(self.query.search_term.as_str(), String::as_str)
    }

    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    /// Where the view should be.
    pub fn route(&self) -> Route {
        match self.session_state {
            SessionState::Active => Route::Users,
            SessionState::Expired => Route::Login,
        }
    }

    pub fn can_go_prev(&self) -> bool {
        self.query.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.query.page < self.pages_count()
    }

    /// Earliest pending timer: the search commit or the status auto-clear.
    pub fn next_deadline(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        match (self.search.deadline(), self.status.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn is_expired(&self) -> bool {
        self.session_state == SessionState::Expired
    }

    // ---- fetch orchestration ----

    /// Issue a fetch with the current parameters.
    ///
    /// A non-silent load shows the loading status first.
    pub fn load(&mut self, silent: bool) -> Option<FetchTicket> {
        if self.is_expired() {
            return None;
        }
        if !silent {
            self.status.set(Status::loading(LOADING_TEXT));
        }
        let ticket = FetchTicket {
            id: self.generations.next(FETCH_KIND),
            query: self.query.clone(),
            silent,
        };
        debug!(
            "Dispatching fetch #{} for {:?}",
            ticket.id.generation(),
            ticket.query
        );
        Some(ticket)
    }

    /// Go to page `n`. Pages outside `1..=pages_count` are rejected.
    pub fn set_page(&mut self, n: u32) -> Option<FetchTicket> {
        if self.is_expired() || n == self.query.page || n < 1 || n > self.pages_count() {
            return None;
        }
        self.query.page = n;
        self.load(false)
    }

    pub fn next_page(&mut self) -> Option<FetchTicket> {
        if !self.can_go_next() {
            return None;
        }
        self.set_page(self.query.page + 1)
    }

    pub fn prev_page(&mut self) -> Option<FetchTicket> {
        if !self.can_go_prev() {
            return None;
        }
        self.set_page(self.query.page - 1)
    }

    pub fn set_page_size(&mut self, size: PageSize) -> Option<FetchTicket> {
        if self.is_expired() || size == self.query.page_size {
            return None;
        }
        self.query.page_size = size;
        self.query.page = 1;
        self.selection.clear();
        self.load(false)
    }

    /// Record a search-box edit.
    ///
    /// The text only becomes the search term once it survives the debounce interval, but the
    /// edit itself already moves back to page 1 and drops the selection.
    pub fn set_search_text(&mut self, text: impl Into<String>) -> Option<FetchTicket> {
        if self.is_expired() {
            return None;
        }
        let now = self.clock.now();
        let mut ticket = self
            .search
            .push(text.into(), now)
            .and_then(|settled| self.commit_search(settled));

        self.selection.clear();
        if self.query.page != 1 {
            self.query.page = 1;
            ticket = self.load(false);
        }
        ticket
    }

    /// Let due timers fire: the status auto-clear and the search commit.
    pub fn tick(&mut self) -> Option<FetchTicket> {
        self.status.tick();
        if self.is_expired() {
            return None;
        }
        let settled = self.search.poll(self.clock.now())?;
        self.commit_search(settled)
    }

    fn commit_search(&mut self, settled: String) -> Option<FetchTicket> {
        if settled == self.query.search_term {
            return None;
        }
        debug!("Search settled on {settled:?}");
        self.query.search_term = settled;
        self.query.page = 1;
        self.selection.clear();
        self.load(false)
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns a follow-up fetch when the page fell beyond the new page count and had to be
    /// clamped.
    pub fn finish_load(
        &mut self,
        ticket: FetchTicket,
        result: Result<UsersPage, ApiError>,
    ) -> Option<FetchTicket> {
        if self.is_expired() {
            return None;
        }

        match result {
            Err(err) if err.is_unauthorized() => {
                self.expire(&err);
                None
            }
            _ if self.ordering == FetchOrdering::LatestRequestWins
                && !self.generations.is_latest(ticket.id) =>
            {
                debug!(
                    "Dropping stale fetch #{} result",
                    ticket.id.generation()
                );
                None
            }
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.selection.clear();
                if !ticket.silent {
                    self.status.set(Status::idle());
                }

                let pages = self.pages_count();
                if self.query.page > pages {
                    debug!("Page {} is past the last page {pages}", self.query.page);
                    self.query.page = pages;
                    return self.load(ticket.silent);
                }
                None
            }
            Err(err) => {
                warn!("Loading users failed: {err}");
                self.status.set(Status::error(err.message_or(LOAD_ERROR_TEXT)));
                None
            }
        }
    }

    // ---- selection ----

    /// Flip `id` in the selection. Ids not on the current page are ignored.
    pub fn toggle_one(&mut self, id: UserId) -> bool {
        if !self.items.iter().any(|user| user.id == id) {
            return false;
        }
        self.selection.toggle(id);
        true
    }

    /// Select every row, or clear the selection when everything is already selected.
    pub fn toggle_all(&mut self) {
        if self.selection.len() == self.items.len() {
            self.selection.clear();
        } else {
            self.selection
                .replace_with(self.items.iter().map(|user| user.id));
        }
    }

    pub fn is_all_selected(&self) -> bool {
        !self.items.is_empty() && self.selection.len() == self.items.len()
    }

    // ---- bulk actions ----

    pub fn do_bulk(&mut self, action: BulkAction) -> Option<BulkTicket> {
        if self.is_expired() {
            return None;
        }
        if self.selection.is_empty() {
            self.status.set(Status::error(SELECT_FIRST_TEXT));
            return None;
        }
        Some(self.bulk_ticket(BulkRequest::Action {
            action,
            ids: self.selection.ids().to_vec(),
        }))
    }

    pub fn delete_unverified(&mut self) -> Option<BulkTicket> {
        if self.is_expired() {
            return None;
        }
        Some(self.bulk_ticket(BulkRequest::DeleteUnverified))
    }

    fn bulk_ticket(&mut self, request: BulkRequest) -> BulkTicket {
        self.status.set(Status::loading(WORKING_TEXT));
        BulkTicket {
            id: self.generations.next(BULK_KIND),
            request,
        }
    }

    /// Apply the outcome of a mutation. Success returns the silent reload to perform.
    pub fn finish_bulk(
        &mut self,
        ticket: BulkTicket,
        result: Result<ActionOutcome, ApiError>,
    ) -> Option<FetchTicket> {
        if self.is_expired() {
            return None;
        }

        match result {
            Ok(outcome) => {
                let text = match (&ticket.request, outcome.message) {
                    (_, Some(message)) => message,
                    (BulkRequest::Action { .. }, None) => DONE_TEXT.to_owned(),
                    (BulkRequest::DeleteUnverified, None) => format!(
                        "Deleted unverified: {}",
                        outcome
                            .affected
                            .map_or_else(|| "?".to_owned(), |n| n.to_string())
                    ),
                };
                info!("Bulk request #{} done: {text}", ticket.id.generation());
                self.selection.clear();
                self.status.set(Status::success(text));
                self.load(true)
            }
            Err(err) if err.is_unauthorized() => {
                self.expire(&err);
                None
            }
            Err(err) => {
                warn!("Bulk request failed: {err}");
                self.status
                    .set(Status::error(err.message_or(ACTION_ERROR_TEXT)));
                None
            }
        }
    }

    fn expire(&mut self, err: &ApiError) {
        warn!(
            "Session rejected ({}), returning to login",
            err.code().unwrap_or("401")
        );
        self.session.clear();
        self.session_state = SessionState::Expired;
        self.selection.clear();
        self.search.cancel();
        self.status.reset();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use userdesk_states::{Clock, ManualClock};

    use super::*;
    use crate::session::MemoryTokenStorage;
    use crate::status::StatusKind;
    use crate::users::model::UserStatus;

    struct Fixture {
        clock: ManualClock,
        session: SessionStore,
        controller: UsersController,
    }

    fn fixture_with(config: BusinessConfig) -> Fixture {
        let clock = ManualClock::default();
        let session = SessionStore::new(Arc::new(MemoryTokenStorage::with_token("tok")));
        let controller = UsersController::new(&config, session.clone(), clock.shared());
        Fixture {
            clock,
            session,
            controller,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(BusinessConfig::default())
    }

    fn users(ids: std::ops::RangeInclusive<i64>) -> Vec<UserSummary> {
        ids.map(|id| UserSummary {
            id: UserId::Num(id),
            name: format!("user {id}"),
            email: format!("user{id}@example.com"),
            last_login_at: None,
            status: UserStatus::Active,
        })
        .collect()
    }

    fn page(ids: std::ops::RangeInclusive<i64>, total: u64) -> Result<UsersPage, ApiError> {
        Ok(UsersPage {
            items: users(ids),
            total,
        })
    }

    fn unauthorized(code: &str) -> ApiError {
        ApiError::Remote {
            status: 401,
            code: Some(code.to_owned()),
            message: "Unauthorized".to_owned(),
        }
    }

    fn loaded(f: &mut Fixture, total: u64) {
        let ticket = f.controller.load(false).expect("active session");
        assert!(f.controller.finish_load(ticket, page(1..=3, total)).is_none());
    }

    #[test]
    fn load_shows_loading_then_idle() {
        let mut f = fixture();
        let ticket = f.controller.load(false).expect("active session");
        assert_eq!(f.controller.status(), &Status::loading(LOADING_TEXT));
        assert!(!ticket.is_silent());

        f.controller.finish_load(ticket, page(1..=3, 45));
        assert_eq!(f.controller.status(), &Status::idle());
        assert_eq!(f.controller.items().len(), 3);
        assert_eq!(f.controller.pages_count(), 3);
    }

    #[test]
    fn silent_load_leaves_status_alone() {
        let mut f = fixture();
        let ticket = f.controller.load(true).expect("active session");
        assert_eq!(f.controller.status(), &Status::idle());

        f.controller.finish_load(ticket, Ok(UsersPage::default()));
        assert_eq!(f.controller.status(), &Status::idle());
    }

    #[test]
    fn load_failure_uses_message_or_fallback() {
        let mut f = fixture();
        let ticket = f.controller.load(false).expect("active session");
        f.controller
            .finish_load(ticket, Err(ApiError::Network(String::new())));
        assert_eq!(f.controller.status(), &Status::error(LOAD_ERROR_TEXT));

        let ticket = f.controller.load(false).expect("active session");
        f.controller.finish_load(
            ticket,
            Err(ApiError::Remote {
                status: 500,
                code: None,
                message: "Database down".to_owned(),
            }),
        );
        assert_eq!(f.controller.status(), &Status::error("Database down"));
    }

    #[test]
    fn successful_load_clears_selection() {
        let mut f = fixture();
        loaded(&mut f, 3);
        f.controller.toggle_all();
        assert_eq!(f.controller.selected().len(), 3);

        loaded(&mut f, 3);
        assert!(f.controller.selected().is_empty());
    }

    #[test]
    fn page_navigation_stops_at_the_bounds() {
        let mut f = fixture();
        loaded(&mut f, 45);

        assert!(f.controller.prev_page().is_none());
        assert!(f.controller.set_page(0).is_none());

        let ticket = f.controller.set_page(2).expect("page 2 exists");
        assert_eq!(ticket.query().page, 2);
        let ticket = f.controller.next_page().expect("page 3 exists");
        assert_eq!(ticket.query().page, 3);

        assert!(f.controller.next_page().is_none());
        assert!(f.controller.set_page(4).is_none());
        assert_eq!(f.controller.query().page, 3);
    }

    #[test]
    fn same_page_is_not_refetched() {
        let mut f = fixture();
        loaded(&mut f, 45);
        assert!(f.controller.set_page(1).is_none());
        assert!(f.controller.set_page_size(PageSize::Twenty).is_none());
    }

    #[test]
    fn page_size_change_resets_page_and_selection() {
        let mut f = fixture();
        loaded(&mut f, 45);
        let ticket = f.controller.set_page(2).expect("page 2");
        f.controller.finish_load(ticket, page(21..=23, 45));
        f.controller.toggle_one(UserId::Num(21));

        let ticket = f.controller.set_page_size(PageSize::Fifty).expect("new size");
        assert_eq!(f.controller.query().page, 1);
        assert!(f.controller.selected().is_empty());
        assert_eq!(ticket.query().page_size, PageSize::Fifty);
        assert_eq!(f.controller.status().kind, StatusKind::Loading);
    }

    #[test]
    fn search_settles_after_quiet_interval() {
        let mut f = fixture();
        loaded(&mut f, 45);

        assert!(f.controller.set_search_text("al").is_none());
        f.clock.advance_millis(100);
        assert!(f.controller.set_search_text("alice").is_none());

        f.clock.advance_millis(399);
        assert!(f.controller.tick().is_none());

        f.clock.advance_millis(1);
        let ticket = f.controller.tick().expect("search settled");
        assert_eq!(ticket.query().search_term, "alice");
        assert_eq!(f.controller.query().search_term, "alice");
        assert!(!f.controller.is_search_pending());
    }

    #[test]
    fn search_edit_resets_page_and_selection_immediately() {
        let mut f = fixture();
        loaded(&mut f, 45);
        let ticket = f.controller.set_page(3).expect("page 3");
        f.controller.finish_load(ticket, page(41..=45, 45));
        f.controller.toggle_one(UserId::Num(41));

        let ticket = f.controller.set_search_text("bob").expect("page reset refetches");
        assert_eq!(ticket.query().page, 1);
        assert_eq!(ticket.query().search_term, "");
        assert!(f.controller.selected().is_empty());
    }

    #[test]
    fn settling_on_the_current_term_does_not_refetch() {
        let mut f = fixture();
        f.controller.set_search_text("x");
        f.clock.advance_millis(100);
        f.controller.set_search_text("");
        f.clock.advance_millis(400);
        assert!(f.controller.tick().is_none());
    }

    #[test]
    fn toggle_one_ignores_unknown_ids() {
        let mut f = fixture();
        loaded(&mut f, 3);

        assert!(!f.controller.toggle_one(UserId::Num(99)));
        assert!(f.controller.toggle_one(UserId::Num(2)));
        assert!(f.controller.is_selected(&UserId::Num(2)));
        assert!(f.controller.toggle_one(UserId::Num(2)));
        assert!(f.controller.selected().is_empty());
    }

    #[test]
    fn toggle_all_twice_restores_selection() {
        let mut f = fixture();
        loaded(&mut f, 3);

        f.controller.toggle_all();
        assert!(f.controller.is_all_selected());
        f.controller.toggle_all();
        assert!(f.controller.selected().is_empty());

        f.controller.toggle_all();
        assert_eq!(
            f.controller.selected(),
            &[UserId::Num(1), UserId::Num(2), UserId::Num(3)]
        );
    }

    #[test]
    fn partial_selection_toggles_to_all() {
        let mut f = fixture();
        loaded(&mut f, 3);
        f.controller.toggle_one(UserId::Num(3));

        f.controller.toggle_all();
        assert!(f.controller.is_all_selected());
    }

    #[test]
    fn empty_page_is_never_all_selected() {
        let f = fixture();
        assert!(!f.controller.is_all_selected());
    }

    #[test]
    fn bulk_without_selection_is_a_local_error() {
        let mut f = fixture();
        loaded(&mut f, 3);

        assert!(f.controller.do_bulk(BulkAction::Block).is_none());
        assert_eq!(f.controller.status(), &Status::error(SELECT_FIRST_TEXT));
    }

    #[test]
    fn bulk_success_reports_and_reloads_silently() {
        let mut f = fixture();
        loaded(&mut f, 3);
        f.controller.toggle_one(UserId::Num(1));
        f.controller.toggle_one(UserId::Num(3));

        let ticket = f.controller.do_bulk(BulkAction::Block).expect("selection");
        assert_eq!(f.controller.status(), &Status::loading(WORKING_TEXT));
        assert_eq!(
            ticket.request(),
            &BulkRequest::Action {
                action: BulkAction::Block,
                ids: vec![UserId::Num(1), UserId::Num(3)],
            }
        );

        let reload = f
            .controller
            .finish_bulk(ticket, Ok(ActionOutcome::default()))
            .expect("silent reload");
        assert!(reload.is_silent());
        assert_eq!(f.controller.status(), &Status::success(DONE_TEXT));
        assert!(f.controller.selected().is_empty());

        f.controller.finish_load(reload, page(1..=3, 3));
        assert_eq!(f.controller.status(), &Status::success(DONE_TEXT));
    }

    #[test]
    fn delete_unverified_message_falls_back_to_count() {
        let mut f = fixture();
        let ticket = f.controller.delete_unverified().expect("active");
        f.controller.finish_bulk(
            ticket,
            Ok(ActionOutcome {
                message: None,
                affected: Some(4),
            }),
        );
        assert_eq!(f.controller.status(), &Status::success("Deleted unverified: 4"));

        let ticket = f.controller.delete_unverified().expect("active");
        f.controller
            .finish_bulk(ticket, Ok(ActionOutcome::default()));
        assert_eq!(f.controller.status(), &Status::success("Deleted unverified: ?"));
    }

    #[test]
    fn bulk_failure_keeps_selection() {
        let mut f = fixture();
        loaded(&mut f, 3);
        f.controller.toggle_one(UserId::Num(2));

        let ticket = f.controller.do_bulk(BulkAction::Delete).expect("selection");
        let reload = f.controller.finish_bulk(
            ticket,
            Err(ApiError::Remote {
                status: 500,
                code: None,
                message: String::new(),
            }),
        );
        assert!(reload.is_none());
        assert_eq!(f.controller.status(), &Status::error(ACTION_ERROR_TEXT));
        assert_eq!(f.controller.selected(), &[UserId::Num(2)]);
    }

    #[test]
    fn unauthorized_bulk_expires_the_session_quietly() {
        let mut f = fixture();
        loaded(&mut f, 3);
        f.controller.toggle_one(UserId::Num(1));

        let ticket = f.controller.do_bulk(BulkAction::Unblock).expect("selection");
        let reload = f
            .controller
            .finish_bulk(ticket, Err(unauthorized("INVALID_TOKEN")));

        assert!(reload.is_none());
        assert!(!f.session.is_logged_in());
        assert_eq!(f.controller.session_state(), SessionState::Expired);
        assert_eq!(f.controller.route(), Route::Login);
        assert!(f.controller.status().text.is_empty());
        assert!(f.controller.selected().is_empty());
    }

    #[test]
    fn expired_controller_ignores_input() {
        let mut f = fixture();
        let ticket = f.controller.load(false).expect("active");
        f.controller.finish_load(ticket, Err(unauthorized("USER_BLOCKED")));

        assert!(f.controller.load(false).is_none());
        assert!(f.controller.set_page_size(PageSize::Ten).is_none());
        assert!(f.controller.delete_unverified().is_none());
        assert!(f.controller.do_bulk(BulkAction::Block).is_none());
        assert_eq!(f.controller.status(), &Status::idle());
    }

    #[test]
    fn starts_expired_without_a_token() {
        let config = BusinessConfig::default();
        let controller =
            UsersController::new(&config, SessionStore::in_memory(), ManualClock::default().shared());
        assert_eq!(controller.session_state(), SessionState::Expired);
    }

    #[test]
    fn last_response_wins_by_default() {
        let mut f = fixture();
        let first = f.controller.load(false).expect("active");
        let second = f.controller.load(false).expect("active");

        f.controller.finish_load(second, page(1..=2, 2));
        f.controller.finish_load(first, page(5..=5, 1));
        assert_eq!(f.controller.items()[0].id, UserId::Num(5));
    }

    #[test]
    fn latest_request_wins_drops_stale_results() {
        let mut f = fixture_with(BusinessConfig {
            fetch_ordering: FetchOrdering::LatestRequestWins,
            ..BusinessConfig::default()
        });
        let first = f.controller.load(false).expect("active");
        let second = f.controller.load(false).expect("active");

        f.controller.finish_load(second, page(1..=2, 2));
        f.controller.finish_load(first, page(5..=5, 1));
        assert_eq!(f.controller.items().len(), 2);
        assert_eq!(f.controller.items()[0].id, UserId::Num(1));
    }

    #[test]
    fn page_past_the_end_is_clamped() {
        let mut f = fixture();
        loaded(&mut f, 45);
        let ticket = f.controller.set_page(3).expect("page 3");

        // Rows were deleted meanwhile; only one page is left.
        let follow_up = f
            .controller
            .finish_load(ticket, page(1..=5, 5))
            .expect("clamped reload");
        assert_eq!(f.controller.query().page, 1);
        assert_eq!(follow_up.query().page, 1);
    }

    #[test]
    fn status_auto_clears_through_tick() {
        let mut f = fixture();
        loaded(&mut f, 3);
        f.controller.do_bulk(BulkAction::Block);
        assert_eq!(f.controller.status().kind, StatusKind::Error);

        f.clock.advance_millis(3_000);
        f.controller.tick();
        assert_eq!(f.controller.status(), &Status::idle());
    }

    #[test]
    fn next_deadline_is_the_earliest_timer() {
        let mut f = fixture();
        loaded(&mut f, 3);
        f.controller.do_bulk(BulkAction::Block);
        f.clock.advance_millis(1_000);
        f.controller.set_search_text("a");

        let deadline = f.controller.next_deadline().expect("timers armed");
        assert_eq!(deadline, f.clock.now() + chrono::Duration::milliseconds(400));
    }
}
