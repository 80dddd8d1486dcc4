use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use reqwest::Client;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{Res, api, types::PendingAuthorization};

/// Serves the OAuth callback on `callback_path` until the task is aborted.
pub async fn serve(
    listener: TcpListener,
    callback_path: String,
    state: Arc<Mutex<PendingAuthorization>>,
    http: Client,
) -> Res<()> {
    let callback_path = if callback_path.is_empty() {
        "/".to_string()
    } else {
        callback_path
    };

    let app = Router::new().route(
        &callback_path,
        get(api::callback)
            .layer::<_, std::convert::Infallible>(Extension(state))
            .layer(Extension(http)),
    );

    tracing::debug!("callback server listening on {:?}", listener.local_addr());
    axum::serve(listener, app).await?;
    Ok(())
}
