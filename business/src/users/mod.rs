//! User management: the list view's data, endpoints and state machine.

pub mod api;
mod controller;
mod model;
mod query;
mod runtime;
mod selection;

pub use controller::{
    ACTION_ERROR_TEXT, BulkRequest, BulkTicket, DONE_TEXT, FetchTicket, LOAD_ERROR_TEXT,
    LOADING_TEXT, SELECT_FIRST_TEXT, SessionState, UsersController, WORKING_TEXT,
};
pub use model::{ActionOutcome, BulkAction, UserId, UserStatus, UserSummary, UsersPage};
pub use query::{PageSize, QueryParams, pages_count};
pub use runtime::{Ticket, TokioClock, UsersRuntime};
pub use selection::Selection;
