//! HTTP client for network-based API calls

use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{DeskError, DeskResult};

/// JSON-over-HTTP client bound to one service base URL
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl NetworkHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> DeskResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeskError::Network(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            timeout,
        })
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> DeskResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        self.send(self.client.get(&url)).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> DeskResult<T> {
        let url = self.url(path);
        debug!(%url, "POST");
        self.send(self.client.post(&url).json(body)).await
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> DeskResult<T> {
        let url = self.url(path);
        debug!(%url, "PUT");
        self.send(self.client.put(&url).json(body)).await
    }

    /// Make a PATCH request with JSON body
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> DeskResult<T> {
        let url = self.url(path);
        debug!(%url, "PATCH");
        self.send(self.client.patch(&url).json(body)).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> DeskResult<T> {
        let url = self.url(path);
        debug!(%url, "DELETE");
        self.send(self.client.delete(&url)).await
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> DeskResult<T> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.handle_response(response).await
    }

    fn transport_error(&self, e: reqwest::Error) -> DeskError {
        if e.is_timeout() {
            DeskError::Timeout(self.timeout)
        } else {
            DeskError::Network(e.to_string())
        }
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> DeskResult<T> {
        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body).into_owned();
            return match status {
                StatusCode::NOT_FOUND => Err(DeskError::NotFound(text)),
                _ => Err(DeskError::Network(format!("{status}: {text}"))),
            };
        }

        // Empty bodies decode as JSON null so unit-like responses still parse
        let body: &[u8] = if body.is_empty() { b"null" } else { &body };
        serde_json::from_slice(body).map_err(|e| DeskError::InvalidResponse(e.to_string()))
    }
}
