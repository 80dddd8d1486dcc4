use std::path::PathBuf;

use super::{Context, SpotifydOptions};
use crate::{
    Res,
    management::{ImageCache, StatusManager},
    notify::Notifier,
    spotify::SpotifyApi,
    types::{PlayableItem, Status},
    utils,
};

/// Event spotifyd reports through the environment of its hook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookEvent {
    pub player_event: String,
    pub track_id: Option<String>,
}

impl HookEvent {
    /// Reads `PLAYER_EVENT` and `TRACK_ID`.
    pub fn from_env() -> Self {
        Self {
            player_event: std::env::var("PLAYER_EVENT").unwrap_or_default(),
            track_id: std::env::var("TRACK_ID").ok().filter(|id| !id.is_empty()),
        }
    }

    pub fn is_play(&self) -> bool {
        self.player_event == "play"
    }
}

/// spotifyd `on_song_change_hook`.
///
/// On a `play` event the current playback state is written to the status
/// cache. When the item differs from the previously cached one a desktop
/// notification with the item's cover is sent.
pub async fn spotifyd<C: SpotifyApi, N: Notifier>(
    client: &C,
    notifier: &N,
    event: &HookEvent,
    opts: &SpotifydOptions,
    ctx: &Context,
) -> Res<()> {
    if !event.is_play() {
        tracing::debug!("ignoring player event {:?}", event.player_event);
        return Ok(());
    }
    if !ctx.config.notify_enabled() {
        tracing::debug!("notifications disabled in config");
        return Ok(());
    }

    let Some(playback) = client.current_playback().await? else {
        tracing::info!("nothing playing");
        return Ok(());
    };
    if !playback.is_playing {
        return Ok(());
    }
    let Some(item) = playback.item.as_ref() else {
        return Ok(());
    };

    let status_cache = StatusManager::new(&ctx.cache_dir);
    let current_id = event
        .track_id
        .clone()
        .or_else(|| item.id().map(str::to_string));
    let novel = match status_cache.load().await? {
        Some(previous) => previous.item_id() != current_id,
        None => true,
    };

    status_cache.persist(&Status::from(&playback)).await?;

    if !novel {
        tracing::debug!("item unchanged, not notifying");
        return Ok(());
    }
    if opts.disable_notify {
        return Ok(());
    }

    let icon = cover(client, &ImageCache::new(&ctx.cache_dir), item).await?;
    notifier
        .notify(item.name(), &item.description(), icon.as_deref())
        .await
}

/// Path of the cached cover of `item`, downloading it on first use.
async fn cover<C: SpotifyApi>(
    client: &C,
    images: &ImageCache,
    item: &PlayableItem,
) -> Res<Option<PathBuf>> {
    let Some(image) = utils::smallest_image(item.images()) else {
        return Ok(None);
    };

    if images.contains(item.uri()) {
        return Ok(Some(images.path_for(item.uri())));
    }

    let bytes = client.fetch_image(&image.url).await?;
    Ok(Some(images.store(item.uri(), &bytes).await?))
}
