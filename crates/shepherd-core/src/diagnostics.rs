//! Operator-facing diagnostic trace.
//!
//! The [`DiagnosticRecorder`] collects one status line per step of a search
//! (organization probe, each backend call, retry decisions) in the order the
//! steps ran. The rendered trace is for debugging only and is never merged
//! into the context string handed to the language model.

use tracing::debug;

/// Append-only, ordered log of diagnostic lines for one search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticRecorder {
    lines: Vec<String>,
}

impl DiagnosticRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line. Lines are also emitted as `debug` tracing events.
    pub fn record(&mut self, line: impl Into<String>) {
        let line = line.into();
        debug!(target: "shepherd::diagnostics", "{}", line);
        self.lines.push(line);
    }

    pub fn extend<I>(&mut self, lines: I)
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            self.record(line);
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-joined trace.
    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}
