use std::time::Duration;

use tokio::time::sleep;

use super::PlayOptions;
use crate::{
    Error, Res,
    spotify::{PlayRequest, SpotifyApi},
    uri::Uri,
};

/// Time given to a freshly transferred device before playback is retried.
const TRANSFER_SETTLE: Duration = Duration::from_secs(1);

/// Turns the command line elements into a play request.
///
/// A single context element is played as context. Otherwise everything that
/// is not a track or episode is dropped; nothing left means resume.
/// Elements that are not uris of a known kind are dropped as well.
pub fn play_request(elements: &[String]) -> Res<PlayRequest> {
    let uris: Vec<Uri> = elements
        .iter()
        .filter_map(|e| match e.parse::<Uri>() {
            Ok(uri) => Some(uri),
            Err(err) => {
                tracing::debug!("dropping {}: {}", e, err);
                None
            }
        })
        .collect();

    if let [uri] = uris.as_slice() {
        if uri.is_context() {
            return Ok(PlayRequest::Context(uri.clone()));
        }
    }

    let items: Vec<Uri> = uris.into_iter().filter(Uri::is_playable).collect();
    if items.is_empty() {
        return Ok(PlayRequest::Resume);
    }
    Ok(PlayRequest::Items(items))
}

/// Starts playback. When the API reports no active device, playback is
/// transferred to the requested or first available device and the request
/// is retried once.
pub async fn play<C: SpotifyApi>(client: &C, opts: &PlayOptions) -> Res<()> {
    let request = play_request(&opts.elements)?;
    tracing::debug!("play request: {:?}", request);

    match client.play(&request).await {
        Err(e) if e.is_not_found() => {
            tracing::info!("{}; transferring playback", e);
            let device_id = match &opts.device_id {
                Some(id) => id.clone(),
                None => first_device(client).await?,
            };

            client.transfer_playback(&device_id).await?;
            client.set_shuffle(false, Some(&device_id)).await?;
            if opts.shuffle {
                client.set_shuffle(true, Some(&device_id)).await?;
            } else {
                sleep(TRANSFER_SETTLE).await;
            }

            client.play(&request).await
        }
        result => result,
    }
}

async fn first_device<C: SpotifyApi>(client: &C) -> Res<String> {
    client
        .devices()
        .await?
        .into_iter()
        .find_map(|d| d.id)
        .ok_or_else(|| Error::NotFound("no devices available".to_string()))
}
