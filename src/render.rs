//! Output rendering for the chat console.
//!
//! Everything the user sees goes through an [`OutputSink`] as whole lines tagged with a
//! [`Style`].  The session decides what to say; the sink decides how it looks.

use std::io::{self, Stderr, Stdout, Write};

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for user turns).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for yellow text (used for assistant turns).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI escape code for green text (used for usage statistics).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// How a line of output should be presented.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    /// Prompts and status messages.
    Neutral,
    /// Echo of the user's message.
    UserTurn,
    /// The assistant's reply.
    AssistantTurn,
    /// Token usage statistics.
    UsageInfo,
    /// Failures reported to the user.
    Error,
}

impl Style {
    fn ansi(&self) -> Option<&'static str> {
        match self {
            Style::Neutral => None,
            Style::UserTurn => Some(ANSI_CYAN),
            Style::AssistantTurn => Some(ANSI_YELLOW),
            Style::UsageInfo => Some(ANSI_GREEN),
            Style::Error => Some(ANSI_RED),
        }
    }
}

/// Destination for user-visible text.
pub trait OutputSink: Send {
    /// Write one line of text with a presentation hint.
    fn write_line(&mut self, text: &str, style: Style);
}

/// Plain text renderer with optional ANSI styling.
///
/// Lines go to stdout, except [`Style::Error`] lines which go to stderr.
pub struct PlainTextRenderer {
    stdout: Stdout,
    stderr: Stderr,
    use_color: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            stderr: io::stderr(),
            use_color,
        }
    }

    /// Returns true if ANSI styling is enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    fn styled(&self, text: &str, style: Style) -> String {
        match style.ansi() {
            Some(color) if self.use_color => {
                text.lines()
                    .map(|line| format!("{color}{line}{ANSI_RESET}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            }
            _ => text.to_string(),
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for PlainTextRenderer {
    fn write_line(&mut self, text: &str, style: Style) {
        let line = self.styled(text, style);
        // A closed terminal leaves nowhere to report the failure.
        if style == Style::Error {
            let _ = writeln!(self.stderr, "{line}");
            let _ = self.stderr.flush();
        } else {
            let _ = writeln!(self.stdout, "{line}");
            let _ = self.stdout.flush();
        }
    }
}

/// An [`OutputSink`] that keeps every line in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    lines: Vec<(String, Style)>,
}

impl RecordingSink {
    /// Creates an empty recording.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line written, in order.
    pub fn lines(&self) -> &[(String, Style)] {
        &self.lines
    }

    /// The text of every line written with `style`.
    pub fn with_style(&self, style: Style) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|(_, s)| *s == style)
            .map(|(text, _)| text.as_str())
            .collect()
    }

    /// True if some line equals `text`.
    pub fn contains(&self, text: &str) -> bool {
        self.lines.iter().any(|(line, _)| line == text)
    }
}

impl OutputSink for RecordingSink {
    fn write_line(&mut self, text: &str, style: Style) {
        self.lines.push((text.to_string(), style));
    }
}
