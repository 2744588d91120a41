//! `Transport` backed by `reqwest`.
//!
//! Status text is the reason phrase the server sent, falling back to the
//! canonical phrase for the status code. Once the status line has arrived
//! the exchange counts as answered: if a non-2xx body cannot be read, the
//! response is returned with an empty body so the status text is used. A
//! 2xx whose body cannot be read has no usable result and is reported as a
//! `TransportError`.

use std::time::Duration;

use reqwest::Method;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpResponse, RequestConfig};
use crate::transport::Transport;

/// Executes requests with a shared `reqwest::Client`.
///
/// The client is configured with redirects disabled so a 3xx reaches the
/// normalizer as-is, matching how every other non-2xx status is treated.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::build(None)
    }

    /// Default timeout for every request that does not set its own.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        Self::build(Some(timeout))
    }

    fn build(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: RequestConfig) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(method(request.method), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let status_text = reason_phrase(&response);
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(classify(e)),
            Err(e) => {
                tracing::debug!(status = status.as_u16(), error = %e, "error body unreadable");
                String::new()
            }
        };

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}

fn reason_phrase(response: &reqwest::Response) -> String {
    match response.extensions().get::<hyper::ext::ReasonPhrase>() {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => response
            .status()
            .canonical_reason()
            .unwrap_or_default()
            .to_string(),
    }
}

fn method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Unreachable(err.to_string())
    } else if err.is_builder() {
        TransportError::InvalidRequest(err.to_string())
    } else {
        TransportError::Io(err.to_string())
    }
}
