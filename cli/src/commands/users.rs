//! List users command and the table shared with the interactive console.

use anyhow::{Result, bail};
use console::style;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tracing::instrument;
use userdesk_business::users::{
    PageSize, QueryParams, SessionState, UserId, UserSummary, UsersController, UsersRuntime,
};
use userdesk_business::{Status, StatusKind};

use crate::context::AppContext;
use crate::output::Output;

pub const NOT_SIGNED_IN_TEXT: &str = "Not signed in. Run `userdesk login` first.";
pub const SESSION_EXPIRED_TEXT: &str = "Session expired. Please sign in again.";

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "")]
    mark: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Last login")]
    last_login: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl UserRow {
    fn new(user: &UserSummary, selected: bool) -> Self {
        let paint = |text: String| {
            if user.is_highlighted() {
                style(text).red().to_string()
            } else {
                text
            }
        };

        Self {
            mark: if selected { "[x]" } else { "[ ]" },
            id: paint(user.id.to_string()),
            name: paint(user.name.clone()),
            email: paint(user.email.clone()),
            last_login: paint(user.last_login_display()),
            status: paint(user.status.to_string()),
        }
    }
}

/// The current page as a table; blocked users are highlighted.
pub fn render_table(items: &[UserSummary], selected: &[UserId]) -> String {
    let rows: Vec<UserRow> = items
        .iter()
        .map(|user| UserRow::new(user, selected.contains(&user.id)))
        .collect();

    let mut table = Table::new(&rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Table, footer and status line for the controller's current state.
pub fn print_page(out: &Output, controller: &UsersController) {
    out.newline();
    if controller.items().is_empty() {
        out.dim("No users found.");
    } else {
        out.print(render_table(controller.items(), controller.selected()));
    }
    out.page_footer(
        controller.query().page,
        controller.pages_count(),
        controller.total(),
    );
    if !controller.query().search_term.trim().is_empty() {
        out.dim(format!("Search: {}", controller.query().search_term.trim()));
    }
    out.status(controller.status());
}

/// Fail if the last operation left the session expired or an error on the status line.
pub fn ensure_succeeded(runtime: &UsersRuntime) -> Result<()> {
    let controller = runtime.controller();
    if controller.session_state() == SessionState::Expired {
        bail!(SESSION_EXPIRED_TEXT);
    }
    if let Status {
        kind: StatusKind::Error,
        text,
    } = controller.status()
    {
        bail!("{text}");
    }
    Ok(())
}

#[instrument(skip_all, name = "users", fields(page = page, search = search.as_deref().unwrap_or("")))]
pub async fn run_users(
    ctx: &AppContext,
    page: u32,
    page_size: Option<PageSize>,
    search: Option<String>,
) -> Result<()> {
    let out = Output::new();

    if !ctx.session.is_logged_in() {
        bail!(NOT_SIGNED_IN_TEXT);
    }

    let query = QueryParams {
        page,
        page_size: page_size.unwrap_or(ctx.config.default_page_size),
        search_term: search.unwrap_or_default(),
    };
    let mut runtime = ctx.users_runtime(Some(query));

    runtime.apply(|c| c.load(false));
    runtime.settle().await;
    let result = ensure_succeeded(&runtime);
    if result.is_ok() {
        print_page(&out, runtime.controller());
    }

    runtime.shutdown().await;
    result
}
