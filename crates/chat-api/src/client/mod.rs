//! HTTP client
//!
//! Thin reqwest wrapper: one request per call, no retries, errors mapped to
//! [`RestError`].

mod rest;

use crate::response::{status_error, transport_error};
use crate::routes::Route;
use chat_common::{ApiConfig, Token};
use chat_core::{RestError, RestResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// User agent sent with every request
pub const CLIENT_USER_AGENT: &str = concat!(
    "DiscordBot (",
    env!("CARGO_PKG_NAME"),
    ", ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// REST client over HTTPS
#[derive(Clone)]
pub struct HttpRestClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpRestClient {
    /// Build a client that authenticates every request with `token`
    pub fn new(config: &ApiConfig, token: &Token) -> RestResult<Self> {
        let mut auth = HeaderValue::from_str(token.expose())
            .map_err(|_| RestError::Transport("token contains invalid header characters".to_string()))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| RestError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// API base URL, without a trailing slash
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a route
    #[must_use]
    pub fn url(&self, route: &Route) -> String {
        format!("{}{}", self.base_url, route.path())
    }

    /// Issue a bodyless request and decode the JSON response
    pub(crate) async fn get<T: DeserializeOwned>(&self, route: Route) -> RestResult<T> {
        let request = self.http.request(route.method(), self.url(&route));
        self.execute(route, request).await
    }

    /// Issue a request with a JSON body and decode the JSON response
    pub(crate) async fn send_json<B, T>(&self, route: Route, body: &B) -> RestResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.request(route.method(), self.url(&route)).json(body);
        self.execute(route, request).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        route: Route,
        request: reqwest::RequestBuilder,
    ) -> RestResult<T> {
        tracing::debug!(route = %route, "Sending REST request");

        let response = request.send().await.map_err(|e| transport_error(&e))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = status_error(status, &body);
            tracing::debug!(route = %route, status = status.as_u16(), error = %err, "REST request failed");
            return Err(err);
        }

        let bytes = response.bytes().await.map_err(|e| transport_error(&e))?;
        serde_json::from_slice(&bytes).map_err(|e| RestError::Decode(e.to_string()))
    }
}

impl std::fmt::Debug for HttpRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRestClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
