//! # Output Configuration
//!
//! Utilities controlling CLI output appearance, plus the one-shot notice
//! used to tell the user (exactly once per session) that the network is
//! being consulted.
//!
//! ## Respecting User Preferences
//!
//! The module respects the following environment variables and flags:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::cell::Cell;
use std::env;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// # Arguments
    /// * `color_flag` - The value of the --color CLI flag: "always", "never", or "auto"
    ///
    /// In auto mode, colors are disabled if:
    /// - `NO_COLOR` environment variable is set (any value, including empty)
    /// - `CLICOLOR=0` is set
    /// - `TERM=dumb` is set
    /// - stdout is not a TTY (unless `CLICOLOR_FORCE=1`)
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    /// Detect whether color output is supported based on environment.
    fn detect_color_support() -> bool {
        // The presence of NO_COLOR (even if empty) disables colors
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        // Use console crate's detection for TTY and color support
        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the appropriate string based on color configuration.
///
/// When colors are enabled, returns the emoji. When disabled, returns
/// the plain text alternative.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// A notice emitted at most once.
///
/// Owned by the session (one CLI invocation, one resolution run), not by the
/// process: two sessions each print their own notice, and a session that
/// never touches the network prints nothing. Both the resolver and the
/// fetcher call [`OnceNotice::emit`] before their first remote operation;
/// whichever runs first wins.
///
/// Notices go to stderr because stdout carries the machine-readable file
/// list.
#[derive(Debug)]
pub struct OnceNotice {
    message: String,
    shown: Cell<bool>,
}

impl OnceNotice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown: Cell::new(false),
        }
    }

    /// Print the notice if it has not been printed yet.
    pub fn emit(&self) {
        if !self.shown.replace(true) {
            eprintln!("{}", self.message);
        }
    }

    /// Whether the notice has been emitted.
    pub fn emitted(&self) -> bool {
        self.shown.get()
    }
}
