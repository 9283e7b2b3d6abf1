//! Terminal utilities for colored status output.

use colored::*;
use std::io::{self, IsTerminal};

/// Check if we're running in a controlling terminal.
pub fn in_controlling_terminal() -> bool {
    io::stdin().is_terminal() && io::stdout().is_terminal()
}

/// Highlight an informational word ("populated", "missing").
pub fn info(text: &str) -> String {
    text.green().to_string()
}

/// Highlight a warning word.
pub fn warn(text: &str) -> String {
    text.yellow().to_string()
}

/// Render a resource or key name.
pub fn name(text: &str) -> String {
    text.cyan().to_string()
}

/// A check mark or cross for a boolean status.
pub fn status_mark(ok: bool) -> String {
    if ok {
        "✓".green().bold().to_string()
    } else {
        "✗".red().bold().to_string()
    }
}
