//! Entry point for issuing console API requests.
//!
//! # Design
//! `ApiClient` holds a `base_url` and a transport and carries no mutable
//! state between calls. Every request goes through `request`, which runs
//! `prepare_request`, the transport round-trip, then `normalize_response`.
//! Callers always get a `ResultEnvelope` back, whatever happened on the wire.

use serde::Serialize;
use tracing::{debug, warn};

use crate::envelope::ResultEnvelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, RequestConfig};
use crate::normalize::{normalize_response, prepare_request};
use crate::transport::Transport;

/// Stateless client for the console REST API.
///
/// Safe to share between concurrent requests when the transport is.
#[derive(Debug, Clone)]
pub struct ApiClient<T> {
    base_url: String,
    transport: T,
}

impl<T: Transport> ApiClient<T> {
    pub fn new(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolve `path` against the base url. Absolute urls are used as given.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send `config` and normalize the outcome.
    pub async fn request(&self, config: &RequestConfig) -> ResultEnvelope {
        let prepared = prepare_request(config);
        let method = prepared.method;
        let url = prepared.url.clone();
        debug!(%method, %url, "sending request");

        let outcome = self.transport.execute(prepared).await;
        match &outcome {
            Ok(response) => debug!(%method, %url, status = response.status, "response received"),
            Err(e) => warn!(%method, %url, error = %e, "request got no response"),
        }
        normalize_response(outcome)
    }

    pub async fn get(&self, path: &str) -> ResultEnvelope {
        self.request(&RequestConfig::new(HttpMethod::Get, self.url(path)))
            .await
    }

    pub async fn delete(&self, path: &str) -> ResultEnvelope {
        self.request(&RequestConfig::new(HttpMethod::Delete, self.url(path)))
            .await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ResultEnvelope {
        self.send_json(HttpMethod::Post, path, body).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ResultEnvelope {
        self.send_json(HttpMethod::Put, path, body).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ResultEnvelope {
        self.send_json(HttpMethod::Patch, path, body).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> ResultEnvelope {
        match json_request(method, self.url(path), body) {
            Ok(config) => self.request(&config).await,
            Err(e) => {
                warn!(%method, path, error = %e, "request body not serializable");
                ResultEnvelope::failure(e.to_string())
            }
        }
    }
}

#[cfg(feature = "reqwest")]
impl ApiClient<crate::reqwest_transport::ReqwestTransport> {
    /// Client over `reqwest` configured from `ClientConfig`.
    pub fn from_config(
        config: &crate::config::ClientConfig,
    ) -> Result<Self, crate::error::TransportError> {
        let transport = match config.timeout {
            Some(timeout) => crate::reqwest_transport::ReqwestTransport::with_timeout(timeout)?,
            None => crate::reqwest_transport::ReqwestTransport::new()?,
        };
        Ok(Self::new(&config.base_url, transport))
    }
}

/// Build a request with `body` encoded as JSON. The content type is left to
/// `prepare_request`.
pub fn json_request<B: Serialize + ?Sized>(
    method: HttpMethod,
    url: String,
    body: &B,
) -> Result<RequestConfig, ApiError> {
    let body = serde_json::to_string(body)?;
    Ok(RequestConfig::new(method, url).body(body))
}
