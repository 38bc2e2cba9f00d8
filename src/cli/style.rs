//! Consistent styling utilities for langvm CLI output
//!
//! Respects the [NO_COLOR standard](https://no-color.org/) and `LVM_COLORS`
//! (`always` / `never`), otherwise asks the terminal.

use std::env;
use std::io::IsTerminal;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use supports_color::Stream;

/// Detect if colors should be enabled
#[must_use]
pub fn colors_enabled() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if let Ok(val) = env::var("LVM_COLORS") {
        if val == "never" || val == "0" || val == "false" {
            return false;
        }
        if val == "always" || val == "1" || val == "true" {
            return true;
        }
    }

    supports_color::on(Stream::Stdout).is_some_and(|level| level.has_basic)
}

/// Check if a user is watching (stderr is a terminal)
#[must_use]
pub fn is_tty() -> bool {
    std::io::stderr().is_terminal()
}

static PROGRESS_SUPPRESSED: AtomicBool = AtomicBool::new(false);

/// Stop progress bars from drawing, e.g. while the full-screen UI owns the terminal
pub fn suppress_progress() {
    PROGRESS_SUPPRESSED.store(true, Ordering::Relaxed);
}

/// Whether progress bars may draw on stderr
#[must_use]
pub fn progress_enabled() -> bool {
    !PROGRESS_SUPPRESSED.load(Ordering::Relaxed) && is_tty()
}

/// Check if unicode icons should be used
#[must_use]
pub fn use_unicode() -> bool {
    if let Ok(val) = env::var("LVM_UNICODE") {
        return val != "0" && val != "false";
    }
    colors_enabled()
}

/// Apply color only if colors are enabled
#[inline]
#[must_use]
pub fn maybe_color(text: &str, f: impl Fn(&str) -> String) -> String {
    if colors_enabled() {
        f(text)
    } else {
        text.to_string()
    }
}

/// Get an icon (unicode or ASCII fallback)
#[inline]
#[must_use]
pub fn icon(unicode: &str, ascii: &str) -> String {
    if use_unicode() {
        unicode.to_string()
    } else {
        ascii.to_string()
    }
}

/// Header with arrow prefix (e.g., "==> Python versions")
#[must_use]
pub fn header(msg: &str) -> String {
    maybe_color(msg, |m| format!("{} {}", "==>".magenta().bold(), m.bold()))
}

#[must_use]
pub fn success(msg: &str) -> String {
    maybe_color(msg, |m| format!("{} {}", icon("✓", "OK").green().bold(), m))
}

#[must_use]
pub fn error(msg: &str) -> String {
    maybe_color(msg, |m| format!("{} {}", icon("✗", "X").red().bold(), m))
}

#[must_use]
pub fn info(msg: &str) -> String {
    maybe_color(msg, |m| format!("{} {}", icon("ℹ", "i").blue().bold(), m))
}

#[must_use]
pub fn warning(msg: &str) -> String {
    maybe_color(msg, |m| format!("{} {}", icon("⚠", "!").yellow().bold(), m))
}

/// Arrow prefix for sub-items
#[must_use]
pub fn arrow(msg: &str) -> String {
    maybe_color(msg, |m| format!("{} {}", icon("→", ">").cyan().bold(), m))
}

/// Dimmed/muted text
#[must_use]
pub fn dim(msg: &str) -> String {
    maybe_color(msg, |m| m.dimmed().to_string())
}

/// Version string (green)
#[must_use]
pub fn version(ver: &str) -> String {
    maybe_color(ver, |v| v.green().to_string())
}

/// Runtime name (cyan)
#[must_use]
pub fn runtime(name: &str) -> String {
    maybe_color(name, |n| n.cyan().bold().to_string())
}

/// File path (yellow)
#[must_use]
pub fn path(p: &str) -> String {
    maybe_color(p, |path| path.yellow().to_string())
}

/// Create a spinner for long-running bridge calls
#[allow(clippy::expect_used)] // Static template string
pub fn spinner(msg: &str) -> ProgressBar {
    if !progress_enabled() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .expect("valid template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_no_color_strips_styling() {
        temp_env::with_var("NO_COLOR", Some("1"), || {
            assert!(!colors_enabled());
            assert_eq!(version("3.12.0"), "3.12.0");
            assert_eq!(success("done"), format!("{} done", icon("✓", "OK")));
        });
    }

    #[test]
    #[serial]
    fn test_forced_colors() {
        temp_env::with_vars(
            [("NO_COLOR", None), ("LVM_COLORS", Some("always"))],
            || {
                assert!(colors_enabled());
                assert_ne!(version("3.12.0"), "3.12.0");
            },
        );
    }

    #[test]
    #[serial]
    fn test_ascii_icons() {
        temp_env::with_var("LVM_UNICODE", Some("0"), || {
            assert_eq!(icon("✓", "OK"), "OK");
        });
    }
}
