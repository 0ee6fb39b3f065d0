//! Styled terminal output.

use console::{Term, style};
use directory_business::ErrorView;
use std::fmt::Display;

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

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        drop(self.term.write_line(&message.to_string()));
    }

    pub fn newline(&self) {
        drop(self.term.write_line(""));
    }

    pub fn header(&self, message: impl Display) {
        drop(
            self.term
                .write_line(&style(message).bold().cyan().to_string()),
        );
    }

    pub fn subheader(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).bold().to_string()));
    }

    /// Print a labeled value with indentation. Empty values are skipped.
    pub fn labeled_indent(&self, label: impl Display, value: &str, indent: usize) {
        if value.is_empty() {
            return;
        }
        let spaces = " ".repeat(indent);
        drop(
            self.term
                .write_line(&format!("{spaces}{}: {}", style(label).dim(), value)),
        );
    }

    /// Print a dim/muted message.
    pub fn dim(&self, message: impl Display) {
        drop(self.term.write_line(&style(message).dim().to_string()));
    }

    /// Print a count summary.
    pub fn count(&self, label: impl Display, count: usize) {
        drop(self.term.write_line(&format!(
            "{}: {}",
            style(label).dim(),
            style(count).cyan().bold()
        )));
    }

    /// Print the error page shown in place of failed content.
    pub fn error_view(&self, view: &ErrorView) {
        self.error(style(&view.title).red().bold());
        self.print(format!("  {}", view.description));
        if let Some(cause) = &view.cause {
            self.dim(format!("  {cause}"));
        }
        let actions: Vec<&str> = view.actions.iter().map(|action| action.label()).collect();
        self.dim(format!("  [{}]", actions.join("] [")));
    }
}
