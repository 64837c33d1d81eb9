//! Command implementations for the userdesk CLI.
//!
//! Each subcommand is implemented in its own module for better organization.

pub mod completions;
pub mod console;
pub mod delete_unverified;
pub mod login;
pub mod users;

pub use completions::generate_completions;
pub use console::run_console;
pub use delete_unverified::run_delete_unverified;
pub use login::{run_confirm, run_login, run_logout, run_register};
pub use users::run_users;
