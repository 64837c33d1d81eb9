#![allow(clippy::exit)]

//! `userdesk`: terminal console for managing user accounts.

mod cli;
mod commands;
mod config;
mod context;
mod output;
mod timing;

use anyhow::Result;
use clap::Parser as _;
use tracing::{debug, error};
use userdesk_business::users::QueryParams;

use crate::cli::{Cli, Commands};
use crate::context::AppContext;
use crate::output::Output;

async fn run(cli: Cli) -> Result<()> {
    let command = match cli.command {
        Some(Commands::Completions { shell }) => {
            commands::generate_completions(shell);
            return Ok(());
        }
        other => other,
    };

    let ctx = AppContext::from_env(cli.api_url)?;

    match command {
        None => commands::run_console(&ctx, None).await,
        Some(Commands::Login { email }) => commands::run_login(&ctx, email).await,
        Some(Commands::Logout) => {
            commands::run_logout(&ctx);
            Ok(())
        }
        Some(Commands::Register { name, email }) => {
            commands::run_register(&ctx, name, email).await
        }
        Some(Commands::Confirm { email, token }) => {
            commands::run_confirm(&ctx, &email, &token).await
        }
        Some(Commands::Users {
            page,
            page_size,
            search,
            interactive: true,
        }) => {
            let query = QueryParams {
                page,
                page_size: page_size.unwrap_or(ctx.config.default_page_size),
                search_term: search.unwrap_or_default(),
            };
            commands::run_console(&ctx, Some(query)).await
        }
        Some(Commands::Users {
            page,
            page_size,
            search,
            interactive: false,
        }) => commands::run_users(&ctx, page, page_size, search).await,
        Some(Commands::DeleteUnverified { yes }) => {
            commands::run_delete_unverified(&ctx, yes).await
        }
        Some(Commands::Completions { .. }) => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    timing::init_tracing(cli.verbose, cli.timing);
    if let Ok(path) = dotenv {
        debug!("Loaded environment from {}", path.display());
    }

    if let Err(e) = run(cli).await {
        error!("{e:#}");
        Output::new().error(format!("{e:#}"));
        std::process::exit(1);
    }
}
