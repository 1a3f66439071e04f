//! Default values for prebuilt-cache configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Program name of the external repository client.
///
/// Overridden by the `--client` CLI flag or the `PREBUILT_CACHE_CLIENT`
/// environment variable.
pub const DEFAULT_CLIENT: &str = "rt";

/// Delimiter joining the downloaded file list on stdout.
pub const DEFAULT_DELIMITER: &str = ";";

/// Returns the default cache root directory.
///
/// Uses the platform-appropriate cache directory:
/// - Linux: `~/.cache/prebuilt-cache` (XDG Base Directory)
/// - macOS: `~/Library/Caches/prebuilt-cache`
/// - Windows: `{FOLDERID_LocalAppData}\prebuilt-cache`
///
/// Falls back to `.prebuilt-cache` in the current directory if the platform
/// cache directory cannot be determined.
///
/// This can be overridden by the `--cache-root` CLI flag or the
/// `PREBUILT_CACHE_CACHE` environment variable.
pub fn default_cache_root() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".prebuilt-cache"))
        .join("prebuilt-cache")
}
