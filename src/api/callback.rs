use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use reqwest::Client;
use tokio::sync::Mutex;

use crate::{spotify, types::PendingAuthorization};

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<PendingAuthorization>>>,
    Extension(http): Extension<Client>,
) -> Html<&'static str> {
    if let Some(error) = params.get("error") {
        tracing::warn!("authorization denied: {}", error);
        return Html("<h4>Authorization denied.</h4>");
    }

    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut pending = shared_state.lock().await;
    if params.get("state") != Some(&pending.state) {
        tracing::warn!("callback state does not match");
        return Html("<h4>State mismatch.</h4>");
    }

    match spotify::auth::exchange_code(&http, &pending, code).await {
        Ok(token) => {
            pending.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            tracing::warn!("token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
