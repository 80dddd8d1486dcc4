use super::WebApi;
use crate::{
    Error, Res,
    types::{ContextObject, PlayableItem, Playlist, Paging},
    uri::{Uri, UriKind},
};

/// Page size for `GET /me/playlists`, the maximum the API allows.
const PLAYLIST_PAGE_SIZE: &str = "50";

impl WebApi {
    pub(super) async fn get_item(&self, uri: &Uri) -> Res<PlayableItem> {
        match uri.kind {
            UriKind::Track => Ok(PlayableItem::Track(
                self.get_json(&format!("/tracks/{}", uri.id), &[]).await?,
            )),
            UriKind::Episode => Ok(PlayableItem::Episode(
                self.get_json(&format!("/episodes/{}", uri.id), &[]).await?,
            )),
            _ => Err(Error::InvalidUri(format!("{uri} is not a track or episode"))),
        }
    }

    pub(super) async fn get_context(&self, uri: &Uri) -> Res<ContextObject> {
        match uri.kind {
            UriKind::Playlist => {
                self.get_json(
                    &format!("/playlists/{}", uri.id),
                    &[("fields", "uri,name")],
                )
                .await
            }
            UriKind::Album => self.get_json(&format!("/albums/{}", uri.id), &[]).await,
            UriKind::Artist => self.get_json(&format!("/artists/{}", uri.id), &[]).await,
            UriKind::Show => self.get_json(&format!("/shows/{}", uri.id), &[]).await,
            _ => Err(Error::InvalidUri(format!("{uri} is not a context"))),
        }
    }

    pub(super) async fn get_playlists(&self) -> Res<Vec<Playlist>> {
        let mut playlists = Vec::new();
        let mut page: Paging<Playlist> = self
            .get_json("/me/playlists", &[("limit", PLAYLIST_PAGE_SIZE)])
            .await?;

        loop {
            playlists.extend(page.items);
            match page.next {
                Some(next) => page = self.get_json(&next, &[]).await?,
                None => break,
            }
        }

        tracing::debug!("fetched {} playlists", playlists.len());
        Ok(playlists)
    }
}
