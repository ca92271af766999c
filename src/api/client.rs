//! HTTP client with session-scoped bearer auth and 401 handling.
//!
//! Every request reads the token from the shared `Session` at send time,
//! so a token set after the client was built is picked up immediately.
//! A 401 from any endpoint expires the session, redirects to the sign-in
//! route, and is still returned to the caller as `ApiError::Unauthorized`.

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::navigation::Navigator;
use crate::session::Session;

/// Value of the `X-Client-Type` header sent with every request.
const CLIENT_TYPE: &str = "admin-console";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Unauthorized: session token was rejected")]
    Unauthorized,
    #[error("Request failed ({status}): {body}")]
    Status { status: StatusCode, body: String },
    #[error("Request rejected: {0}")]
    Rejected(String),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

/// HTTP client wrapper for STOMATON API communication.
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a client for `base_url` that authenticates with `session` and
    /// reports sign-in redirects to `navigator`.
    pub fn new(base_url: &str, session: Arc<Session>, navigator: Arc<dyn Navigator>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Use `token` as the bearer credential for all following requests.
    pub async fn set_token(&self, token: String) {
        self.session.set_token(token).await;
    }

    /// Send following requests unauthenticated.
    pub async fn clear_token(&self) {
        self.session.clear_token().await;
    }

    pub async fn token(&self) -> Option<Zeroizing<String>> {
        self.session.token().await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a relative API path.
    pub async fn get(&self, path: &str) -> Result<Response, ApiError> {
        self.send(self.client.get(self.url(path))).await
    }

    /// POST a JSON body to a relative API path.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<Response, ApiError> {
        self.send(self.client.post(self.url(path)).json(body)).await
    }

    /// DELETE a relative API path.
    pub async fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.send(self.client.delete(self.url(path))).await
    }

    /// POST a multipart form (document uploads).
    pub async fn multipart_post(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Response, ApiError> {
        self.send(self.client.post(self.url(path)).multipart(form))
            .await
    }

    pub async fn get_json<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        let resp = self.get(path).await?;
        decode_json(resp).await
    }

    pub async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<R, ApiError> {
        let resp = self.post(path, body).await?;
        decode_json(resp).await
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let mut builder = builder.header("X-Client-Type", CLIENT_TYPE);
        if let Some(token) = self.session.token().await {
            builder = builder.bearer_auth(token.as_str());
        }

        let resp = builder.send().await?;
        self.intercept(resp).await
    }

    /// Response-side policy shared by every request.
    async fn intercept(&self, resp: Response) -> Result<Response, ApiError> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            log::warn!("{} answered 401, ending session", resp.url().path());
            self.session.expire().await;
            self.navigator.session_expired();
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        Ok(resp)
    }
}

/// Read a response body as JSON.
pub async fn decode_json<R: DeserializeOwned>(resp: Response) -> Result<R, ApiError> {
    let bytes = resp.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}
