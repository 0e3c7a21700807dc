use std::fmt;

use futures_util::future::{select, Either};
use gloo_net::http::Request;
use gloo_timers::future::TimeoutFuture;

const AUTH_ENDPOINT: &str = "http://server.mouamle.space:19990/api/auth-with-superQi";
const EXCHANGE_TIMEOUT_MS: u32 = 15_000;

/// Authenticated user record as the endpoint returned it. The shape is owned
/// by the server, so it stays an opaque JSON value with a display helper.
#[derive(Clone, PartialEq, Debug)]
pub struct AuthUser(serde_json::Value);

impl AuthUser {
    /// The body either wraps the record in a `user` field or is the record
    /// itself.
    pub fn from_response(body: serde_json::Value) -> Self {
        match body.get("user") {
            Some(user) if !user.is_null() => Self(user.clone()),
            _ => Self(body),
        }
    }

    pub fn display_name(&self) -> String {
        ["name", "displayName"]
            .iter()
            .find_map(|key| self.0.get(key).and_then(|v| v.as_str()))
            .unwrap_or("User")
            .to_string()
    }
}

#[derive(Debug)]
pub enum AuthError {
    Request(gloo_net::Error),
    Status { status: u16, body: String },
    TimedOut,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::Request(err) => write!(f, "Auth request failed: {err}"),
            AuthError::Status { status, body } => write!(f, "Auth failed: {status} {body}"),
            AuthError::TimedOut => write!(f, "Auth request timed out"),
        }
    }
}

impl From<gloo_net::Error> for AuthError {
    fn from(err: gloo_net::Error) -> Self {
        AuthError::Request(err)
    }
}

/// The one token-exchange operation both login paths feed into: the startup
/// `getAuthToken` flow and the button-driven `getAuthCode` flow. Races the
/// request against a timeout so a hung call cannot pin the loading flag
/// forever.
pub async fn exchange_token(token: &str) -> Result<AuthUser, AuthError> {
    let request = Box::pin(post_token(token));
    let timeout = Box::pin(TimeoutFuture::new(EXCHANGE_TIMEOUT_MS));
    match select(request, timeout).await {
        Either::Left((result, _)) => result,
        Either::Right(_) => Err(AuthError::TimedOut),
    }
}

async fn post_token(token: &str) -> Result<AuthUser, AuthError> {
    let payload = serde_json::json!({ "token": token });
    let response = Request::post(AUTH_ENDPOINT).json(&payload)?.send().await?;

    if !response.ok() {
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Status {
            status: response.status(),
            body,
        });
    }

    let body: serde_json::Value = response.json().await?;
    Ok(AuthUser::from_response(body))
}
