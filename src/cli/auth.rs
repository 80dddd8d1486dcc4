use crate::{Res, spotify::SpotifyApi, success};

/// Forces a new authorization, e.g. after the scope changed or access was
/// revoked. The token is persisted by the caller.
pub async fn auth<C: SpotifyApi>(client: &C) -> Res<()> {
    client.authenticate().await?;
    success!("Authentication successful!");
    Ok(())
}
