//! Terminal output.

use console::{Style, Term};

/// Terminal output formatter.
///
/// Rendered HTML goes to stdout, diagnostics to stderr.
pub(crate) struct Output {
    stdout: Term,
    stderr: Term,
    red: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            stdout: Term::stdout(),
            stderr: Term::stderr(),
            red: Style::new().red(),
        }
    }

    /// Write rendered HTML.
    pub(crate) fn html(&self, html: &str) -> std::io::Result<()> {
        self.stdout.write_line(html)
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.stderr.write_line(&self.red.apply_to(msg).to_string());
    }
}
