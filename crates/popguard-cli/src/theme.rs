//! CLI theme and styling.

use colored::Colorize;
use popguard_core::{Disposition, Verdict};

/// CLI theme configuration.
pub(crate) struct Theme;

impl Theme {
    /// Format a header.
    pub(crate) fn header(text: &str) -> String {
        format!("{}", text.bold().cyan())
    }

    /// Format a success message.
    pub(crate) fn success(text: &str) -> String {
        format!("{} {}", "✓".green(), text)
    }

    /// Format an error message.
    pub(crate) fn error(text: &str) -> String {
        format!("{} {}", "✗".red(), text.red())
    }

    /// Format a warning message.
    pub(crate) fn warning(text: &str) -> String {
        format!("{} {}", "!".yellow(), text.yellow())
    }

    /// Format a dimmed message.
    pub(crate) fn dimmed(text: &str) -> String {
        format!("{}", text.dimmed())
    }

    /// Format a separator line.
    pub(crate) fn separator() -> String {
        "━".repeat(50).dimmed().to_string()
    }

    /// Format a key-value pair.
    pub(crate) fn kv(key: &str, value: &str) -> String {
        format!("{}: {}", key.bold(), value)
    }

    /// Format a verdict, padded to a fixed width.
    pub(crate) fn verdict(verdict: Verdict) -> String {
        let label = format!("{:<5}", verdict.to_string());
        match verdict {
            Verdict::Allow => label.green().to_string(),
            Verdict::Block => label.red().bold().to_string(),
            Verdict::AskUser => label.yellow().to_string(),
        }
    }

    /// Format a disposition.
    pub(crate) fn disposition(disposition: &Disposition) -> String {
        match disposition {
            Disposition::Proceeded => "proceeded".green().to_string(),
            Disposition::Suppressed => "suppressed".red().to_string(),
            Disposition::AwaitingConfirmation(id) => format!("awaiting {id}").yellow().to_string(),
            Disposition::Queued => "queued".dimmed().to_string(),
            Disposition::Inert => "inert".dimmed().to_string(),
        }
    }

    /// Format a timestamp in milliseconds.
    pub(crate) fn at_ms(at_ms: u64) -> String {
        format!("{at_ms:>8}ms").dimmed().to_string()
    }
}
