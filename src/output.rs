//! Output helpers for consistent CLI output.
//!
//! Provides standardized output formatting with colored status prefixes.
//! Console output is the operator-facing channel; `tracing` carries
//! diagnostics.

use owo_colors::OwoColorize;

/// Standard output helper for consistent CLI formatting.
pub struct Output;

impl Output {
    /// Print a success message with a green checkmark.
    ///
    /// Example: `✓ Portage complete`
    pub fn success(msg: impl AsRef<str>) {
        println!("{} {}", "✓".green().bold(), msg.as_ref());
    }

    /// Print an error message with a red X to stderr.
    pub fn error(msg: impl AsRef<str>) {
        eprintln!("{} {}", "✗".red().bold(), msg.as_ref().red());
    }

    /// Print a warning message with a yellow warning symbol.
    pub fn warning(msg: impl AsRef<str>) {
        println!("{} {}", "⚠".yellow(), msg.as_ref());
    }

    /// Print an info/status message with a cyan arrow.
    pub fn info(msg: impl AsRef<str>) {
        println!("{} {}", "→".cyan(), msg.as_ref().dimmed());
    }

    /// Print a step message (one per planned step).
    ///
    /// Example: `• Dumping empty schema from dbhost.appdb...`
    pub fn step(msg: impl AsRef<str>) {
        println!("  {} {}", "•".cyan(), msg.as_ref());
    }

    /// Print a header/section title.
    pub fn header(msg: impl AsRef<str>) {
        println!("\n{}\n", msg.as_ref().bold().cyan());
    }

    /// Print the literal command being run (for transparency).
    ///
    /// Example: `Running: mysqldump --no-data ...`
    pub fn running(cmd: impl AsRef<str>) {
        println!("{} {}", "Running:".dimmed(), cmd.as_ref().dimmed());
    }

    /// Print a separator line.
    pub fn separator() {
        println!("{}", "-".repeat(50).dimmed());
    }
}
