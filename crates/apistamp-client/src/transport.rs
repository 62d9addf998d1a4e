//! Transport seam
//!
//! The client hands a fully built `http::Request` to a [`Transport`]. The
//! default [`HyperTransport`] sends it over a pooled hyper connection; tests
//! and applications can plug in their own.

use crate::response::ClientResponse;
use apistamp_core::BoxError;
use async_trait::async_trait;
use bytes::Bytes;
use http::Request;
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use std::time::Duration;
use tracing::{info_span, Instrument};

/// Sends a finished request and buffers the response
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<ClientResponse, BoxError>;
}

/// HTTP/1 transport backed by `hyper-util`'s pooled client
#[derive(Clone)]
pub struct HyperTransport {
    client: Client<HttpConnector, Full<Bytes>>,
    timeout: Option<Duration>,
}

impl HyperTransport {
    /// Create a transport with no timeout
    pub fn new() -> Self {
        Self {
            client: Client::builder(TokioExecutor::new()).build_http(),
            timeout: None,
        }
    }

    /// Fail requests that take longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn execute(&self, request: Request<Full<Bytes>>) -> Result<ClientResponse, BoxError> {
        let response = self.client.request(request).await?;
        let (parts, body) = response.into_parts();
        let body = body.collect().await?.to_bytes();

        tracing::debug!(status = %parts.status, bytes = body.len(), "Received response");
        Ok(ClientResponse::new(parts.status, parts.headers, body))
    }
}

impl Default for HyperTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HyperTransport {
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<ClientResponse, BoxError> {
        let span = info_span!(
            "http.request",
            method = %request.method(),
            uri = %request.uri(),
        );

        async move {
            match self.timeout {
                Some(limit) => tokio::time::timeout(limit, self.execute(request))
                    .await
                    .map_err(|_| -> BoxError { format!("request timed out after {:?}", limit).into() })?,
                None => self.execute(request).await,
            }
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for HyperTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HyperTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
