use std::io::Write;

use crate::{Res, spotify::SpotifyApi};

pub async fn list_playlists<C: SpotifyApi, W: Write>(client: &C, out: &mut W) -> Res<()> {
    for playlist in client.playlists().await? {
        writeln!(out, "{}", playlist.name)?;
    }
    Ok(())
}
