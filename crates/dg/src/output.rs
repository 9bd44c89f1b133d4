//! Terminal output for the CLI.
//!
//! Progress and errors go to stderr so that `dg fields` output can be piped.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};
use dg_model::OutputFormat;

/// Width of the label column in status lines.
const LABEL_WIDTH: usize = 8;

pub(crate) struct Output {
    status: Term,
    listing: Term,
    label: Style,
    ok: Style,
    failed: Style,
    heading: Style,
}

impl Output {
    pub(crate) fn new() -> Self {
        Self {
            status: Term::stderr(),
            listing: Term::stdout(),
            label: Style::new().dim(),
            ok: Style::new().green(),
            failed: Style::new().red(),
            heading: Style::new().cyan().bold(),
        }
    }

    /// `label  value` status line.
    pub(crate) fn field(&self, label: &str, value: impl Display) {
        let label = format!("{label:>LABEL_WIDTH$}");
        let _ = self
            .status
            .write_line(&format!("{}  {value}", self.label.apply_to(label)));
    }

    pub(crate) fn format_done(&self, format: OutputFormat, files: usize, dir: &Path) {
        let label = format!("{:>LABEL_WIDTH$}", format.as_str());
        let _ = self.status.write_line(&format!(
            "{}  {files} file(s) in {}",
            self.ok.apply_to(label),
            dir.display()
        ));
    }

    pub(crate) fn format_failed(&self, format: OutputFormat, error: impl Display) {
        let label = format!("{:>LABEL_WIDTH$}", format.as_str());
        let _ = self
            .status
            .write_line(&format!("{}  {error}", self.failed.apply_to(label)));
    }

    pub(crate) fn error(&self, error: impl Display) {
        let _ = self
            .status
            .write_line(&self.failed.apply_to(format!("Error: {error}")).to_string());
    }

    /// Section heading on stdout.
    pub(crate) fn heading(&self, text: &str) {
        let _ = self
            .listing
            .write_line(&self.heading.apply_to(text).to_string());
    }

    /// Indented listing entry on stdout.
    pub(crate) fn item(&self, text: &str) {
        let _ = self.listing.write_line(&format!("  {text}"));
    }
}
