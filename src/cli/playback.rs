use super::{DeviceOptions, ShuffleOptions};
use crate::{Error, Res, spotify::SpotifyApi};

/// Pauses the given device, or the one that is currently playing.
pub async fn pause<C: SpotifyApi>(client: &C, opts: &DeviceOptions) -> Res<()> {
    let device_id = match &opts.device_id {
        Some(id) => Some(id.clone()),
        None => {
            client
                .current_playback()
                .await?
                .ok_or(Error::NothingPlaying)?
                .device
                .id
        }
    };

    client.pause(device_id.as_deref()).await
}

pub async fn shuffle<C: SpotifyApi>(client: &C, opts: &ShuffleOptions) -> Res<()> {
    client
        .set_shuffle(opts.state, opts.device_id.as_deref())
        .await
}

pub async fn next<C: SpotifyApi>(client: &C, opts: &DeviceOptions) -> Res<()> {
    client.next(opts.device_id.as_deref()).await
}

pub async fn prev<C: SpotifyApi>(client: &C, opts: &DeviceOptions) -> Res<()> {
    client.previous(opts.device_id.as_deref()).await
}
