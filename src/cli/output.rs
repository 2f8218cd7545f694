use colored::Colorize;

use crate::cli::context::{self, Verbosity};

// stdout carries only the command result; everything here goes to stderr.

/// Print a warning message unless in quiet mode.
pub fn warning(msg: &str) {
    if context::verbosity() >= Verbosity::Normal {
        eprintln!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a bold section header, only in verbose mode.
pub fn header(msg: &str) {
    if context::is_verbose() {
        eprintln!("\n{}", msg.bold());
    }
}

/// Print a detail line, only in verbose mode.
pub fn detail(msg: &str) {
    if context::is_verbose() {
        eprintln!("    {}", msg.dimmed());
    }
}

/// Print a success message, only in verbose mode.
pub fn success(msg: &str) {
    if context::is_verbose() {
        eprintln!("  {} {}", "✓".green(), msg);
    }
}
