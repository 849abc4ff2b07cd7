//! Color state of the output stream
//!
//! Colors are on when the stream a command writes to is an interactive
//! terminal, unless the [`App`](crate::App) forces them on or off.

use colored::Colorize;
use std::fmt;
use std::io::IsTerminal;

/// Color preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    /// Colors when the output is a terminal
    #[default]
    Auto,
    /// Always colored
    Always,
    /// Never colored
    Never,
}

/// The stream behind a command's output, as far as terminal detection goes
#[derive(Clone, Copy)]
pub enum TtyTarget<'a> {
    /// Process stdout
    Stdout,
    /// Process stderr
    Stderr,
    /// Any other stream that can tell, such as a `File` or a `BorrowedFd`
    Stream(&'a dyn IsTerminal),
    /// An in-memory or otherwise non-terminal writer
    None,
}

impl TtyTarget<'_> {
    /// Whether the target is an interactive terminal
    pub fn is_terminal(self) -> bool {
        match self {
            TtyTarget::Stdout => std::io::stdout().is_terminal(),
            TtyTarget::Stderr => std::io::stderr().is_terminal(),
            TtyTarget::Stream(stream) => stream.is_terminal(),
            TtyTarget::None => false,
        }
    }
}

impl fmt::Debug for TtyTarget<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TtyTarget::Stdout => f.write_str("Stdout"),
            TtyTarget::Stderr => f.write_str("Stderr"),
            TtyTarget::Stream(_) => f.write_str("Stream(..)"),
            TtyTarget::None => f.write_str("None"),
        }
    }
}

/// Resolved color scheme handed to handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    enabled: bool,
}

impl Color {
    /// Fixed color state
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Resolve the color state for output going to `target`
    pub fn resolve(mode: ColorMode, target: TtyTarget<'_>) -> Self {
        let enabled = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => target.is_terminal(),
        };
        Self { enabled }
    }

    /// Whether colors are emitted
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Turn colors on
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Turn colors off
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> colored::ColoredString) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Yellow text
    pub fn yellow(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow())
    }

    /// Red text
    pub fn red(&self, text: &str) -> String {
        self.paint(text, |t| t.red())
    }

    /// Green text
    pub fn green(&self, text: &str) -> String {
        self.paint(text, |t| t.green())
    }

    /// Cyan text
    pub fn cyan(&self, text: &str) -> String {
        self.paint(text, |t| t.cyan())
    }

    /// Bold text
    pub fn bold(&self, text: &str) -> String {
        self.paint(text, |t| t.bold())
    }

    /// Dimmed text
    pub fn dimmed(&self, text: &str) -> String {
        self.paint(text, |t| t.dimmed())
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new(false)
    }
}
