use reqwest::{Method, StatusCode};
use serde_json::json;

use super::{PlayRequest, WebApi};
use crate::{
    Res,
    types::{Device, DevicesResponse, Playback},
};

impl WebApi {
    pub(super) async fn get_playback(&self) -> Res<Option<Playback>> {
        let response = self
            .send(
                Method::GET,
                "/me/player",
                &[("additional_types", "track,episode")],
                None,
            )
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    pub(super) async fn start_playback(&self, request: &PlayRequest) -> Res<()> {
        let body = match request {
            PlayRequest::Context(uri) => Some(json!({ "context_uri": uri.to_string() })),
            PlayRequest::Items(uris) => Some(json!({
                "uris": uris.iter().map(ToString::to_string).collect::<Vec<_>>()
            })),
            PlayRequest::Resume => None,
        };

        self.send(Method::PUT, "/me/player/play", &[], body.as_ref())
            .await?;
        Ok(())
    }

    pub(super) async fn player_command(
        &self,
        method: Method,
        path: &str,
        device_id: Option<&str>,
    ) -> Res<()> {
        let query: Vec<(&str, &str)> = device_id.map(|id| ("device_id", id)).into_iter().collect();
        self.send(method, path, &query, None).await?;
        Ok(())
    }

    pub(super) async fn shuffle(&self, state: bool, device_id: Option<&str>) -> Res<()> {
        let state = if state { "true" } else { "false" };
        let mut query = vec![("state", state)];
        if let Some(id) = device_id {
            query.push(("device_id", id));
        }

        self.send(Method::PUT, "/me/player/shuffle", &query, None)
            .await?;
        Ok(())
    }

    pub(super) async fn get_devices(&self) -> Res<Vec<Device>> {
        let response: DevicesResponse = self.get_json("/me/player/devices", &[]).await?;
        Ok(response.devices)
    }

    pub(super) async fn transfer(&self, device_id: &str) -> Res<()> {
        let body = json!({ "device_ids": [device_id], "play": false });
        self.send(Method::PUT, "/me/player", &[], Some(&body))
            .await?;
        Ok(())
    }
}
