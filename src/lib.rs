//! Spotify command line client library
//!
//! This library backs the `spotcli` binary: a small command-line front-end to
//! the Spotify Web API that starts, pauses and skips playback, prints
//! now-playing metadata and doubles as the `on_song_change_hook` of spotifyd.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local OAuth callback server
//! - `cli` - Argument parsing and the command handlers
//! - `config` - Configuration file, paths and authentication bootstrap
//! - `error` - Error type shared by all modules
//! - `logging` - Verbosity handling and subscriber setup
//! - `management` - Cache files (authentication, status, cover images)
//! - `notify` - Desktop notifications
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client
//! - `types` - Data structures shared between the modules
//! - `uri` - Spotify URI parsing
//! - `utils` - Small helpers

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod management;
pub mod notify;
pub mod server;
pub mod spotify;
pub mod types;
pub mod uri;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// Every fallible function of the crate returns this alias so errors can be
/// propagated with `?` up to `main`, which reports them and exits.
pub type Res<T> = std::result::Result<T, Error>;

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication successful!");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Creates a formatted error output with a red "!" indicator and immediately
/// terminates the program with exit code 1. Only used by the binary for
/// errors that end the invocation.
///
/// # Example
///
/// ```
/// fatal!("Missing key client_id in section [Authentication]");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! fatal {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}
