//! Terminal rendering of session traffic.

use std::io::Write;

use biolink_core::{Message, Metric, MetricSnapshot, SessionObserver};

/// Prints either the metric line after every accepted update, or every
/// raw message in verbose mode.
pub struct TerminalDisplay<W: Write> {
    out: W,
    verbose: bool,
}

impl TerminalDisplay<std::io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Self::new(std::io::stdout(), verbose)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Render the full metric line.
    pub fn print_snapshot(&mut self, snapshot: &MetricSnapshot) {
        self.emit(format_args!("{snapshot}"));
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            tracing::warn!("display write failed: {e}");
        }
    }
}

impl<W: Write> SessionObserver for TerminalDisplay<W> {
    fn on_message(&mut self, message: &Message) {
        if self.verbose {
            let text = serde_json::to_string(message).unwrap_or_else(|_| format!("{message:?}"));
            self.emit(format_args!("Received message: {text}"));
        }
    }

    fn on_value_change(&mut self, _metric: Metric, _value: f64, snapshot: &MetricSnapshot) {
        if !self.verbose {
            self.print_snapshot(snapshot);
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────
