//! Interactive user-management console.
//!
//! Drives the users runtime from a menu: paging, page size, search, row selection and the bulk
//! actions. When the session expires the console falls back to the login prompt and continues
//! with a fresh list afterwards.

use std::fmt;

use anyhow::{Context as _, Result};
use inquire::{Confirm, MultiSelect, Select, Text};
use tracing::{info, instrument, warn};
use userdesk_business::auth;
use userdesk_business::route::{self, Route};
use userdesk_business::users::{BulkAction, PageSize, QueryParams, SessionState, UsersRuntime};

use crate::commands::login::run_login;
use crate::commands::users::{SESSION_EXPIRED_TEXT, print_page};
use crate::context::AppContext;
use crate::output::Output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    NextPage,
    PrevPage,
    PageSize,
    Search,
    SelectRows,
    ToggleAll,
    Bulk(BulkAction),
    DeleteUnverified,
    Refresh,
    SignOut,
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NextPage => f.write_str("Next page"),
            Self::PrevPage => f.write_str("Previous page"),
            Self::PageSize => f.write_str("Page size"),
            Self::Search => f.write_str("Search"),
            Self::SelectRows => f.write_str("Select rows"),
            Self::ToggleAll => f.write_str("Select all / clear"),
            Self::Bulk(action) => write!(f, "{} selected", action.label()),
            Self::DeleteUnverified => f.write_str("Delete unverified"),
            Self::Refresh => f.write_str("Refresh"),
            Self::SignOut => f.write_str("Sign out"),
            Self::Quit => f.write_str("Quit"),
        }
    }
}

/// Menu entries that make sense right now. Paging entries follow the page bounds.
fn menu(can_go_prev: bool, can_go_next: bool) -> Vec<MenuAction> {
    let mut actions = Vec::new();
    if can_go_next {
        actions.push(MenuAction::NextPage);
    }
    if can_go_prev {
        actions.push(MenuAction::PrevPage);
    }
    actions.extend([
        MenuAction::Search,
        MenuAction::PageSize,
        MenuAction::SelectRows,
        MenuAction::ToggleAll,
        MenuAction::Bulk(BulkAction::Block),
        MenuAction::Bulk(BulkAction::Unblock),
        MenuAction::Bulk(BulkAction::Delete),
        MenuAction::DeleteUnverified,
        MenuAction::Refresh,
        MenuAction::SignOut,
        MenuAction::Quit,
    ]);
    actions
}

/// How the user list was left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Quit,
    SignedOut,
    SessionExpired,
}

/// Run the console until the user quits.
///
/// Without a session the login prompt comes first; `query` is where the first list starts.
#[instrument(skip_all, name = "console")]
pub async fn run_console(ctx: &AppContext, mut query: Option<QueryParams>) -> Result<()> {
    let out = Output::new();

    loop {
        match route::resolve(Some(Route::Users), &ctx.session) {
            Route::Users => match run_user_list(ctx, query.take()).await? {
                Exit::Quit => return Ok(()),
                Exit::SignedOut => out.success("Signed out"),
                Exit::SessionExpired => out.warning(SESSION_EXPIRED_TEXT),
            },
            _ => {
                if let Err(e) = run_login(ctx, None).await {
                    out.error(format!("{e:#}"));
                    let retry = Confirm::new("Try again?")
                        .with_default(true)
                        .prompt_skippable()
                        .context("Failed to read answer")?;
                    if retry != Some(true) {
                        return Ok(());
                    }
                }
            }
        }
    }
}

async fn run_user_list(ctx: &AppContext, query: Option<QueryParams>) -> Result<Exit> {
    let out = Output::new();
    let mut runtime = ctx.users_runtime(query);

    runtime.apply(|c| c.load(false));
    let exit = drive(&out, &mut runtime).await;
    runtime.shutdown().await;

    if let Ok(Exit::SignedOut) = exit {
        auth::logout(&ctx.session);
    }
    exit
}

async fn drive(out: &Output, runtime: &mut UsersRuntime) -> Result<Exit> {
    loop {
        runtime.settle().await;
        if runtime.controller().session_state() == SessionState::Expired {
            info!("Session expired, returning to login");
            return Ok(Exit::SessionExpired);
        }
        print_page(out, runtime.controller());

        let controller = runtime.controller();
        let choice = Select::new(
            "Action:",
            menu(controller.can_go_prev(), controller.can_go_next()),
        )
        .with_page_size(12)
        .prompt_skippable()
        .context("Failed to read action")?;

        // Time passed while the prompt was open.
        runtime.tick();

        let Some(choice) = choice else {
            return Ok(Exit::Quit);
        };

        match choice {
            MenuAction::NextPage => runtime.apply(|c| c.next_page()),
            MenuAction::PrevPage => runtime.apply(|c| c.prev_page()),
            MenuAction::PageSize => {
                let current = runtime.controller().query().page_size;
                let cursor = PageSize::ALL
                    .iter()
                    .position(|size| *size == current)
                    .unwrap_or_default();
                let size = Select::new("Rows per page:", PageSize::ALL.to_vec())
                    .with_starting_cursor(cursor)
                    .prompt_skippable()
                    .context("Failed to read page size")?;
                if let Some(size) = size {
                    runtime.apply(|c| c.set_page_size(size));
                }
            }
            MenuAction::Search => {
                let current = runtime.controller().search_text().to_owned();
                let text = Text::new("Search:")
                    .with_initial_value(&current)
                    .with_help_message("Name or email; leave empty to show everyone")
                    .prompt_skippable()
                    .context("Failed to read search")?;
                if let Some(text) = text {
                    runtime.apply(|c| c.set_search_text(text));
                }
            }
            MenuAction::SelectRows => select_rows(runtime)?,
            MenuAction::ToggleAll => runtime.update(|c| c.toggle_all()),
            MenuAction::Bulk(action) => {
                if action == BulkAction::Delete
                    && !runtime.controller().selected().is_empty()
                    && !confirm(&format!(
                        "Delete {} user(s)?",
                        runtime.controller().selected().len()
                    ))?
                {
                    continue;
                }
                runtime.apply(|c| c.do_bulk(action));
            }
            MenuAction::DeleteUnverified => {
                if confirm("Delete every unverified user?")? {
                    runtime.apply(|c| c.delete_unverified());
                }
            }
            MenuAction::Refresh => runtime.apply(|c| c.load(false)),
            MenuAction::SignOut => return Ok(Exit::SignedOut),
            MenuAction::Quit => return Ok(Exit::Quit),
        }
    }
}

fn confirm(message: &str) -> Result<bool> {
    let answer = Confirm::new(message)
        .with_default(false)
        .prompt_skippable()
        .context("Failed to read answer")?;
    Ok(answer == Some(true))
}

/// Let the user pick rows on the current page; rows whose mark changed are toggled.
fn select_rows(runtime: &mut UsersRuntime) -> Result<()> {
    let controller = runtime.controller();
    if controller.items().is_empty() {
        warn!("Nothing to select on this page");
        return Ok(());
    }

    let options: Vec<String> = controller
        .items()
        .iter()
        .map(|user| format!("{} <{}> [{}]", user.name, user.email, user.id))
        .collect();
    let defaults: Vec<usize> = controller
        .items()
        .iter()
        .enumerate()
        .filter(|(_, user)| controller.is_selected(&user.id))
        .map(|(i, _)| i)
        .collect();

    let picked = MultiSelect::new("Select users:", options)
        .with_default(&defaults)
        .with_help_message("Space to toggle, Enter to confirm")
        .raw_prompt_skippable()
        .context("Failed to read selection")?;
    let Some(picked) = picked else {
        return Ok(());
    };

    let wanted: Vec<usize> = picked.into_iter().map(|option| option.index).collect();
    let changed: Vec<_> = runtime
        .controller()
        .items()
        .iter()
        .enumerate()
        .filter(|(i, user)| wanted.contains(i) != runtime.controller().is_selected(&user.id))
        .map(|(_, user)| user.id)
        .collect();

    runtime.update(|c| {
        for id in changed {
            c.toggle_one(id);
        }
    });
    Ok(())
}
