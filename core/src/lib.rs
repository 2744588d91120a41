//! Client core for the console's REST API.
//!
//! # Overview
//! Every call returns a `ResultEnvelope`: either the decoded response body or
//! an error message. Callers never branch on status codes or transport
//! failures, and mutating requests always carry a content type.
//!
//! # Design
//! - `prepare_request` and `normalize_response` are pure functions; all I/O
//!   happens behind the `Transport` trait.
//! - `ApiClient` is constructed explicitly with its transport and holds no
//!   mutable state, so one instance can serve concurrent requests.
//! - `ReqwestTransport` (feature `reqwest`, on by default) is the production
//!   transport; tests plug in their own.

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod normalize;
#[cfg(feature = "reqwest")]
pub mod reqwest_transport;
pub mod transport;

pub use client::{json_request, ApiClient};
pub use config::ClientConfig;
pub use envelope::{ErrorMessage, ResultEnvelope};
pub use error::{ApiError, ConfigError, ParseMethodError, TransportError};
pub use http::{HttpMethod, HttpResponse, RequestConfig};
pub use normalize::{decode_body, normalize_response, prepare_request, NETWORK_ERROR, TIMEOUT_ERROR};
#[cfg(feature = "reqwest")]
pub use reqwest_transport::ReqwestTransport;
pub use transport::Transport;
