//! Text report assembly for the register decoders.

/// How much detail a decoded report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReportMode {
    /// Every raw field, its interpretation, and compliance warnings.
    Verbose,
    /// Derived facts only, no raw field dump and no warnings.
    Terse,
}

/// An ordered collection of report lines built up by a decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Report {
    lines: Vec<String>,
}

impl Report {
    /// Creates an empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Appends a line.
    pub fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Appends a compliance warning line.
    pub fn warn(&mut self, message: &str) {
        self.lines.push(format!("Warn: {message}"));
    }

    /// The lines accumulated so far, in order.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Renders the report as newline-joined text with a trailing newline.
    /// An empty report renders as the empty string.
    #[must_use]
    pub fn render(&self) -> String {
        if self.lines.is_empty() {
            return String::new();
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}
