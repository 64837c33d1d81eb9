//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use userdesk_business::users::PageSize;

#[derive(Parser)]
#[command(name = "userdesk")]
#[command(about = "Administrative console for user accounts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Base URL of the user service
    #[arg(long, global = true, env = "USERDESK_API_BASE_URL")]
    pub api_url: Option<String>,

    /// Show timing/latency information
    #[arg(long, global = true)]
    pub timing: bool,

    /// Enable verbose debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and keep the session on disk
    Login {
        /// Account email (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },
    /// Forget the saved session
    Logout,
    /// Create a new account
    Register {
        /// Display name (prompted when omitted)
        #[arg(long, short = 'n')]
        name: Option<String>,

        /// Account email (prompted when omitted)
        #[arg(long, short = 'e')]
        email: Option<String>,
    },
    /// Confirm an email address with the values from the confirmation link
    Confirm {
        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        token: String,
    },
    /// List users
    Users {
        /// Page to show (1-based)
        #[arg(long, short = 'p', default_value_t = 1)]
        page: u32,

        /// Rows per page: 10, 20 or 50
        #[arg(long, short = 's')]
        page_size: Option<PageSize>,

        /// Filter by name or email
        #[arg(long, short = 'q')]
        search: Option<String>,

        /// Interactive mode (page, search, select and act on users)
        #[arg(long, short = 'I')]
        interactive: bool,
    },
    /// Delete every account that never confirmed its email
    DeleteUnverified {
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
