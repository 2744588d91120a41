//! The seam between the client and the network.
//!
//! # Design
//! `ApiClient` is generic over `Transport`, so the composition root picks the
//! HTTP stack and tests can substitute canned or recording transports without
//! any global state. Implementations must hand back every status code as an
//! `HttpResponse` and reserve `TransportError` for requests that got no
//! response at all.

use std::future::Future;
use std::sync::Arc;

use crate::error::TransportError;
use crate::http::{HttpResponse, RequestConfig};

pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: RequestConfig,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn execute(
        &self,
        request: RequestConfig,
    ) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        (**self).execute(request)
    }
}
