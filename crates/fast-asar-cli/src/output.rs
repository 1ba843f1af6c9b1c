//! Output styling for the CLI

use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Style configuration for terminal output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputStyle {
    /// Whether to use colors in output
    pub use_color: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_color: no_color_unset() && std::io::stderr().is_terminal(),
        }
    }
}

impl OutputStyle {
    /// Style detected from the environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors in output
    pub const fn no_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

/// `NO_COLOR` counts as set only when non-empty
fn no_color_unset() -> bool {
    std::env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
}

/// Format an error line as `error: <message>`
pub fn format_error(message: &str, style: OutputStyle) -> String {
    if style.use_color {
        format!("{}{} {message}", "error".red(), ":".bright_black())
    } else {
        format!("error: {message}")
    }
}

/// Format a header label
pub fn format_label(text: &str, style: OutputStyle) -> String {
    if style.use_color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}
