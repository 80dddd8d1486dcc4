//! # CLI Module
//!
//! Argument parsing and the command handlers of spotcli.
//!
//! ## Commands
//!
//! - [`play`] - Starts playback of a context, a list of items, or resumes.
//!   Falls back to transferring playback to a device when none is active.
//! - [`pause`], [`next`], [`prev`], [`shuffle`] - Single player commands.
//! - [`metadata`] - Prints the playback state as JSON, through a format
//!   string or as aligned `key: value` lines.
//! - [`list_playlists`] - Prints the names of the user's playlists.
//! - [`spotifyd`] - The `on_song_change_hook` of spotifyd: caches the
//!   playback state and notifies about new tracks.
//! - [`auth`] - Runs the authorization flow.
//! - [`completions`] - Prints shell completions.
//!
//! ## Dispatch
//!
//! Each [`Command`] variant maps to exactly one handler in [`dispatch`].
//! [`run`] wraps it and persists the authentication context afterwards.
//! Handlers receive the client as a [`SpotifyApi`] implementation, so the
//! binary passes a [`crate::spotify::WebApi`] while tests pass a recording
//! mock.
//!
//! ## Usage
//!
//! ```bash
//! spotcli play spotify:playlist:37i9dQZF1DXcBWIGoYBM5M --shuffle
//! spotcli metadata artist_name title
//! spotcli metadata --format '{artist_name} - {title}'
//! spotcli -v shuffle false --device-id abc123
//! ```

mod auth;
mod metadata;
mod play;
mod playback;
mod playlists;
mod spotifyd;

pub use auth::auth;
pub use metadata::{FieldValue, OutputMode, derive_fields, metadata, render, snapshot};
pub use play::{play, play_request};
pub use playback::{next, pause, prev, shuffle};
pub use playlists::list_playlists;
pub use spotifyd::{HookEvent, spotifyd};

use std::{io::Write, path::PathBuf};

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        BoolishValueParser, Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::filter::LevelFilter;

use crate::{
    Res, config::Config, logging, management::AuthManager, notify::Notifier, spotify::SpotifyApi,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  after_help="use 'spotcli <command> --help' for the options of a command",
  styles=styles(),
)]
pub struct Cli {
    /// Increase verbosity; use multiple times for more
    #[clap(short, long, action = ArgAction::Count, global = true, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Only log errors
    #[clap(short, long, global = true)]
    pub quiet: bool,

    /// Path of the config file
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for cached authentication, status and images
    #[clap(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        logging::level(self.verbose, self.quiet)
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start playback
    Play(PlayOptions),

    /// Pause playback
    Pause(DeviceOptions),

    /// Get metadata about the playback state; print all if no fields are given
    Metadata(MetadataOptions),

    /// Set shuffle state
    Shuffle(ShuffleOptions),

    /// Skip to next song
    Next(DeviceOptions),

    /// Skip to previous song
    Prev(DeviceOptions),

    /// List the names of your playlists
    #[clap(name = "list-playlists")]
    ListPlaylists,

    /// Set this in your spotifyd.conf as 'on_song_change_hook'
    #[cfg(unix)]
    Spotifyd(SpotifydOptions),

    /// Authorize with Spotify API
    Auth,

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone, Default)]
pub struct DeviceOptions {
    /// Id of the device to use for playback
    #[clap(long = "device-id")]
    pub device_id: Option<String>,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct PlayOptions {
    /// Id of the device to use for playback
    #[clap(long = "device-id")]
    pub device_id: Option<String>,

    /// Turn shuffle on when playback has to be transferred to a device
    #[clap(long)]
    pub shuffle: bool,

    /// The songs or playlist to start playing
    pub elements: Vec<String>,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct MetadataOptions {
    /// Output in json format
    #[clap(short, long, conflicts_with = "format")]
    pub json: bool,

    /// Format string, e.g. '{artist_name} - {title}'
    #[clap(short, long)]
    pub format: Option<String>,

    /// Read the playback state cached by the spotifyd hook
    #[clap(short = 'c', long)]
    pub use_cache: bool,

    /// Possible values are: device device_id shuffle_state repeat_state
    /// timestamp context context_name progress_ms item currently_playing_type
    /// actions is_playing title images artist artist_name
    pub fields: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ShuffleOptions {
    /// Id of the device to use for playback
    #[clap(long = "device-id")]
    pub device_id: Option<String>,

    /// true/false
    #[clap(required = true, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub state: bool,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct SpotifydOptions {
    /// Do not send a desktop notification
    #[clap(short = 'n', long)]
    pub disable_notify: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    pub shell: Shell,
}

/// What the handlers need besides the client.
#[derive(Debug, Clone)]
pub struct Context {
    pub cache_dir: PathBuf,
    pub config: Config,
}

/// Runs the handler of `command`.
pub async fn dispatch<C, N, W>(
    client: &C,
    notifier: &N,
    command: Command,
    ctx: &Context,
    out: &mut W,
) -> Res<()>
where
    C: SpotifyApi,
    N: Notifier,
    W: Write,
{
    match command {
        Command::Play(opts) => play(client, &opts).await,
        Command::Pause(opts) => pause(client, &opts).await,
        Command::Metadata(opts) => metadata(client, &opts, &ctx.cache_dir, out).await,
        Command::Shuffle(opts) => shuffle(client, &opts).await,
        Command::Next(opts) => next(client, &opts).await,
        Command::Prev(opts) => prev(client, &opts).await,
        Command::ListPlaylists => list_playlists(client, out).await,
        #[cfg(unix)]
        Command::Spotifyd(opts) => {
            spotifyd(client, notifier, &HookEvent::from_env(), &opts, ctx).await
        }
        Command::Auth => auth(client).await,
        Command::Completions(opts) => {
            completions(opts.shell, out);
            Ok(())
        }
    }
}

/// Runs `command` and then persists the client's authentication context,
/// also when the command failed, so obtained or refreshed tokens are kept.
pub async fn run<C, N, W>(
    client: &C,
    notifier: &N,
    command: Command,
    ctx: &Context,
    out: &mut W,
) -> Res<()>
where
    C: SpotifyApi,
    N: Notifier,
    W: Write,
{
    let result = dispatch(client, notifier, command, ctx, out).await;

    if let Err(e) = AuthManager::new(&ctx.cache_dir)
        .persist(&client.authentication().await)
        .await
    {
        tracing::error!("Cannot save authentication: {}", e);
    }

    result
}

/// Writes completions for `shell`.
pub fn completions<W: Write>(shell: Shell, out: &mut W) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out)
}
