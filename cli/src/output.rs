//! Styled lines for the userdesk console: outcome markers, the list status line and the
//! `Page X / Y (total: T)` footer under the user table.

use console::{Term, style};
use std::fmt::Display;
use userdesk_business::{Status, StatusKind};

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    /// Print a success message with a green checkmark.
    pub fn success(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✓").green().bold(), message)),
        );
    }

    /// Print an error message with a red X.
    pub fn error(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("✗").red().bold(), message)),
        );
    }

    /// Print a warning message with a yellow warning sign.
    pub fn warning(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("⚠").yellow().bold(), message)),
        );
    }

    /// Print an info message with a blue info icon.
    pub fn info(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&format!("{} {}", style("ℹ").blue().bold(), message)),
        );
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    /// Print an empty line.
    pub fn newline(&self) {
        drop(self.term.write_line(""));
    }

    /// Print a header with emphasis.
    pub fn header(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&style(message).bold().cyan().to_string()),
        );
    }

    /// Print a dim/muted message.
    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print the status line. Idle prints nothing.
    pub fn status(&self, status: &Status) {
        match status.kind {
            StatusKind::Idle => {}
            StatusKind::Loading => self.dim(&status.text),
            StatusKind::Success => self.success(&status.text),
            StatusKind::Error => self.error(&status.text),
        }
    }

    /// Print the pagination footer.
    pub fn page_footer(&self, page: u32, pages: u32, total: u64) {
        drop(self.term.write_line(&footer_line(page, pages, total)));
    }
}

fn footer_line(page: u32, pages: u32, total: u64) -> String {
    format!(
        "\n{} {} / {} {}",
        style("Page").bold(),
        style(page).cyan().bold(),
        style(pages).cyan(),
        style(format!("(total: {total})")).dim()
    )
}
