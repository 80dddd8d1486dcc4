use std::{sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, Url};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::Mutex};

use super::{AUTH_URL, TOKEN_URL};
use crate::{
    Error, Res, server,
    types::{Authentication, PendingAuthorization, Token},
    utils,
};

/// How long the user has to grant access in the browser.
const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Runs the authorization code flow and returns the obtained token.
///
/// 1. A random `state` is generated and stored together with the client
///    credentials for the callback handler.
/// 2. A local callback server is bound to the host and port of the redirect
///    uri.
/// 3. The authorization url is opened in the browser (and printed if that
///    fails).
/// 4. The callback handler exchanges the returned code for a token; this
///    function waits for it for at most a minute.
pub async fn authorize(http: &Client, authentication: &Authentication) -> Res<Token> {
    let state = utils::generate_state();
    let redirect = Url::parse(&authentication.redirect_uri)
        .map_err(|e| Error::Config(format!("invalid redirect_uri: {e}")))?;
    let (host, port) = utils::callback_address(&redirect)?;

    let pending = Arc::new(Mutex::new(PendingAuthorization {
        state: state.clone(),
        client_id: authentication.client_id.clone(),
        client_secret: authentication.client_secret.clone(),
        redirect_uri: authentication.redirect_uri.clone(),
        token: None,
    }));

    let listener = TcpListener::bind((host.as_str(), port)).await?;
    let server = tokio::spawn(server::serve(
        listener,
        redirect.path().to_string(),
        Arc::clone(&pending),
        http.clone(),
    ));

    let url = authorize_url(authentication, &state)?;
    if webbrowser::open(url.as_str()).is_err() {
        tracing::warn!("failed to open browser");
    }
    eprintln!(
        "Grant access in your browser. If it did not open, navigate to:\n{}",
        url
    );

    let token = wait_for_token(pending).await;
    server.abort();

    token.ok_or_else(|| Error::Auth("authorization failed or timed out".to_string()))
}

/// Url of Spotify's authorization page for the given context.
pub fn authorize_url(authentication: &Authentication, state: &str) -> Res<Url> {
    Url::parse_with_params(
        AUTH_URL,
        &[
            ("client_id", authentication.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", authentication.redirect_uri.as_str()),
            ("state", state),
            ("scope", authentication.scope.as_str()),
        ],
    )
    .map_err(|e| Error::Config(format!("invalid authorization url: {e}")))
}

async fn wait_for_token(pending: Arc<Mutex<PendingAuthorization>>) -> Option<Token> {
    use std::time::Instant;

    let pb = ProgressBar::new_spinner();
    pb.set_message("Waiting for authorization...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let start = Instant::now();
    while start.elapsed() < AUTHORIZATION_TIMEOUT {
        let lock = pending.lock().await;
        if let Some(token) = &lock.token {
            pb.finish_and_clear();
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(500)).await;
    }

    pb.finish_and_clear();
    None
}

/// Exchanges the code from the callback for a token.
pub async fn exchange_code(
    http: &Client,
    pending: &PendingAuthorization,
    code: &str,
) -> Res<Token> {
    let response = http
        .post(TOKEN_URL)
        .basic_auth(&pending.client_id, Some(&pending.client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", pending.redirect_uri.as_str()),
        ])
        .send()
        .await?;

    token_from_response(response, None).await
}

/// Exchanges the refresh token of `authentication` for a new access token.
pub async fn refresh_token(http: &Client, authentication: &Authentication) -> Res<Token> {
    let previous = authentication
        .token
        .as_ref()
        .ok_or_else(|| Error::Auth("no token to refresh".to_string()))?;

    let response = http
        .post(TOKEN_URL)
        .basic_auth(&authentication.client_id, Some(&authentication.client_secret))
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", previous.refresh_token.as_str()),
        ])
        .send()
        .await?;

    token_from_response(response, Some(previous)).await
}

/// Builds a token from a token endpoint response. Spotify may omit the
/// refresh token and scope on refresh; those are carried over.
async fn token_from_response(response: reqwest::Response, previous: Option<&Token>) -> Res<Token> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Auth(format!("token endpoint answered {status}: {body}")));
    }

    let json: TokenResponse = response.json().await?;
    let refresh_token = json
        .refresh_token
        .or_else(|| previous.map(|t| t.refresh_token.clone()))
        .unwrap_or_default();
    let scope = json
        .scope
        .or_else(|| previous.map(|t| t.scope.clone()))
        .unwrap_or_default();

    Ok(Token {
        access_token: json.access_token,
        refresh_token,
        scope,
        expires_in: json.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SCOPE, default_redirect_uri};

    #[test]
    fn builds_authorize_url() {
        let authentication = Authentication {
            client_id: "abc".to_string(),
            client_secret: "secret".to_string(),
            scope: SCOPE.to_string(),
            redirect_uri: default_redirect_uri(),
            token: None,
        };

        let url = authorize_url(&authentication, "xyz").unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().into_owned().collect();

        assert_eq!(url.host_str(), Some("accounts.spotify.com"));
        assert_eq!(params["client_id"], "abc");
        assert_eq!(params["response_type"], "code");
        assert_eq!(params["state"], "xyz");
        assert_eq!(params["redirect_uri"], "http://127.0.0.1:8888/callback");
        assert_eq!(params["scope"], SCOPE);
        assert!(!params.contains_key("client_secret"));
    }
}
