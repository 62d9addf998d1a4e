//! Client and client builder

use crate::error::{ClientError, Result};
use crate::request::RequestBuilder;
use crate::transport::{HyperTransport, Transport};
use crate::versioning::VersionSettings;
use apistamp_core::{ApiVersion, ApiVersionInserter};
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Method, Uri};
use std::fmt;
use std::sync::Arc;

/// HTTP client that stamps an API version onto each request
///
/// Cheap to clone; clones share configuration and transport.
///
/// # Example
///
/// ```rust,ignore
/// use apistamp_client::Client;
/// use apistamp_core::ApiVersionInserter;
///
/// let client = Client::builder()
///     .base_url("http://localhost:8080")
///     .default_api_version(1.2)
///     .api_version_inserter(ApiVersionInserter::use_header("X-API-Version")?)
///     .build()?;
///
/// // Sent with X-API-Version: 1.2
/// client.get("/users").send().await?;
///
/// // Sent with X-API-Version: 2
/// client.get("/users").api_version(2u32).send().await?;
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) base: Uri,
    pub(crate) default_headers: HeaderMap,
    pub(crate) versioning: VersionSettings,
    pub(crate) transport: Arc<dyn Transport>,
}

impl Client {
    /// Start configuring a client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Start a request with `method` on `uri` (a path, optionally with a query)
    pub fn request(&self, method: Method, uri: &str) -> RequestBuilder {
        RequestBuilder::new(self.clone(), method, uri)
    }

    /// Start a GET request
    pub fn get(&self, uri: &str) -> RequestBuilder {
        self.request(Method::GET, uri)
    }

    /// Start a POST request
    pub fn post(&self, uri: &str) -> RequestBuilder {
        self.request(Method::POST, uri)
    }

    /// Start a PUT request
    pub fn put(&self, uri: &str) -> RequestBuilder {
        self.request(Method::PUT, uri)
    }

    /// Start a PATCH request
    pub fn patch(&self, uri: &str) -> RequestBuilder {
        self.request(Method::PATCH, uri)
    }

    /// Start a DELETE request
    pub fn delete(&self, uri: &str) -> RequestBuilder {
        self.request(Method::DELETE, uri)
    }

    /// Base URI requests are resolved against
    pub fn base_url(&self) -> &Uri {
        &self.inner.base
    }

    /// Client-wide versioning settings
    pub fn versioning(&self) -> &VersionSettings {
        &self.inner.versioning
    }

    pub(crate) fn inner(&self) -> &ClientInner {
        &self.inner
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base", &self.inner.base)
            .field("default_headers", &self.inner.default_headers)
            .field("versioning", &self.inner.versioning)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`]
pub struct ClientBuilder {
    base_url: Option<String>,
    default_headers: HeaderMap,
    default_api_version: Option<ApiVersion>,
    inserter: Option<ApiVersionInserter>,
    transport: Option<Arc<dyn Transport>>,
    error: Option<ClientError>,
}

impl ClientBuilder {
    /// Create a builder with no base URL, headers or versioning
    pub fn new() -> Self {
        Self {
            base_url: None,
            default_headers: HeaderMap::new(),
            default_api_version: None,
            inserter: None,
            transport: None,
            error: None,
        }
    }

    /// Base URL all request paths are appended to
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Header sent with every request unless the request sets it itself
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.default_headers.append(name, value);
            }
            _ => {
                self.error
                    .get_or_insert(ClientError::InvalidHeader(name.to_string()));
            }
        }
        self
    }

    /// Version used for every request that does not set its own
    pub fn default_api_version(mut self, version: impl Into<ApiVersion>) -> Self {
        self.default_api_version = Some(version.into());
        self
    }

    /// Inserter used to place the version on each request
    pub fn api_version_inserter(mut self, inserter: ApiVersionInserter) -> Self {
        self.inserter = Some(inserter);
        self
    }

    /// Replace the default [`HyperTransport`]
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Client> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let base_url = self.base_url.ok_or(ClientError::MissingBaseUrl)?;
        let base: Uri = base_url.parse().map_err(|source| ClientError::InvalidUri {
            uri: base_url.clone(),
            source,
        })?;

        tracing::debug!(
            base = %base,
            default_api_version = ?self.default_api_version,
            inserter = ?self.inserter.as_ref().map(|i| i.strategy().to_string()),
            "Built client"
        );

        Ok(Client {
            inner: Arc::new(ClientInner {
                base,
                default_headers: self.default_headers,
                versioning: VersionSettings::new(self.default_api_version, self.inserter),
                transport: self
                    .transport
                    .unwrap_or_else(|| Arc::new(HyperTransport::new())),
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers)
            .field("default_api_version", &self.default_api_version)
            .field("inserter", &self.inserter)
            .finish_non_exhaustive()
    }
}
