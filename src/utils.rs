//! utilities used across themecap
use {
    std::path::{Path, PathBuf},
    tracing::Level,
};

/// convert a string to a log level
///
/// takes a given string and converts it into a [`tracing::Level`] for later use when setting up
/// tracing in the app module. `off` and anything unknown give `None`
#[bearive::argdoc]
pub fn string_to_log_level(
    /// the string rep of the log level
    lvl: &str,
) -> Option<Level> {
    match lvl.to_lowercase().as_str() {
        "t" | "trace" | "trc" => Some(Level::TRACE),
        "d" | "debug" | "dbg" => Some(Level::DEBUG),
        "i" | "info" | "inf" => Some(Level::INFO),
        "w" | "warn" | "wrn" => Some(Level::WARN),
        "e" | "error" | "err" => Some(Level::ERROR),
        _ => None,
    }
}

/// resolve a configured directory
///
/// `~/` expands to the home directory, relative paths are kept relative to the working
/// directory
#[bearive::argdoc]
pub fn expand_dir(
    /// the directory as configured
    dir: &str,
) -> PathBuf {
    match dir.strip_prefix("~/").zip(dirs::home_dir()) {
        Some((rest, home)) => home.join(rest),
        None => Path::new(dir).to_path_buf(),
    }
}
