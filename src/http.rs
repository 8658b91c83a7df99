// Thin JSON-over-HTTP transport shared by every bot.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{BotError, ConfigError};

/// A `reqwest` client bound to one API base URL and one authorization header.
#[derive(Debug, Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpClient {
    /// `authorization` is sent verbatim (e.g. `Bearer <jwt>` or a raw token).
    pub fn new(base_url: impl Into<String>, authorization: &str) -> Result<Self, BotError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        let auth = HeaderValue::from_str(authorization).map_err(|_| ConfigError::InvalidToken)?;
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response, BotError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let mut request = self.http.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let result = match request.send().await {
            Ok(response) => response.error_for_status(),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            tracing::error!("Request failed: {e}");
            BotError::Transport(e)
        })
    }

    /// Send a request and decode the JSON body.
    pub async fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<T, BotError> {
        let response = self.send(method, endpoint, body).await?;
        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!("Failed to read response body: {e}");
            BotError::Transport(e)
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send a request and return the raw body text.
    pub async fn text(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<String, BotError> {
        let response = self.send(method, endpoint, body).await?;
        response.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {e}");
            BotError::Transport(e)
        })
    }
}
