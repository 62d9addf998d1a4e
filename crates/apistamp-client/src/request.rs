//! Per-request builder

use crate::client::Client;
use crate::error::{ClientError, Result};
use crate::response::ClientResponse;
use apistamp_core::{ApiVersion, RequestParts};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::{Method, Request};
use http_body_util::Full;

/// Builds and sends one request
///
/// The API version is placed on the request in [`build`](Self::build),
/// after all headers and query parameters are set.
#[derive(Debug)]
pub struct RequestBuilder {
    client: Client,
    parts: RequestParts,
    api_version: Option<ApiVersion>,
    error: Option<ClientError>,
}

impl RequestBuilder {
    pub(crate) fn new(client: Client, method: Method, uri: &str) -> Self {
        let mut parts = RequestParts::new(method, uri);
        parts.prefix_path(client.base_url().path());
        Self {
            client,
            parts,
            api_version: None,
            error: None,
        }
    }

    /// Append a header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => self.parts.append_header(name, value),
            _ => {
                self.error
                    .get_or_insert(ClientError::InvalidHeader(name.to_string()));
            }
        }
        self
    }

    /// Append a query parameter
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.append_query(name, value);
        self
    }

    /// Use `version` for this request instead of the client default
    pub fn api_version(mut self, version: impl Into<ApiVersion>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.parts.set_body(body);
        self
    }

    /// Finish the request: merge default headers, insert the API version and
    /// resolve against the base URL
    pub fn build(self) -> Result<Request<Full<Bytes>>> {
        let (_, request) = self.build_split()?;
        Ok(request)
    }

    /// Build the request and send it through the client's transport
    pub async fn send(self) -> Result<ClientResponse> {
        let (client, request) = self.build_split()?;

        tracing::debug!(method = %request.method(), uri = %request.uri(), "Sending request");
        client
            .inner()
            .transport
            .send(request)
            .await
            .map_err(ClientError::Transport)
    }

    fn build_split(self) -> Result<(Client, Request<Full<Bytes>>)> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let Self {
            client,
            mut parts,
            api_version,
            ..
        } = self;
        let inner = client.inner();

        for name in inner.default_headers.keys() {
            if !parts.headers().contains_key(name) {
                for value in inner.default_headers.get_all(name) {
                    parts.append_header(name.clone(), value.clone());
                }
            }
        }

        inner.versioning.apply(api_version.as_ref(), &mut parts)?;

        let request = parts.into_request(&inner.base)?;
        Ok((client, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apistamp_core::{ApiVersionInserter, InsertError};

    fn client(inserter: Option<ApiVersionInserter>, default: Option<f64>) -> Client {
        let mut builder = Client::builder().base_url("http://localhost:8080/api");
        if let Some(inserter) = inserter {
            builder = builder.api_version_inserter(inserter);
        }
        if let Some(version) = default {
            builder = builder.default_api_version(version);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_build_inserts_request_version() {
        let client = client(Some(ApiVersionInserter::use_header("X-API-Version").unwrap()), None);

        let request = client.get("/path").api_version(1.2).build().unwrap();

        assert_eq!(request.headers()["x-api-version"], "1.2");
        assert_eq!(request.uri().to_string(), "http://localhost:8080/api/path");
    }

    #[test]
    fn test_insertion_sees_final_query() {
        let client = client(Some(ApiVersionInserter::use_query_param("api-version").unwrap()), Some(1.0));

        let request = client.get("/path?a=1").query("b", "2").build().unwrap();

        assert_eq!(
            request.uri().path_and_query().unwrap().as_str(),
            "/api/path?a=1&b=2&api-version=1"
        );
    }

    #[test]
    fn test_path_segment_counts_base_path() {
        let inserter = ApiVersionInserter::builder()
            .use_path_segment(0)
            .with_version_formatter(|v| format!("v{}", v))
            .build()
            .unwrap();
        let client = client(Some(inserter), Some(2.0));

        let request = client.get("/users/7").build().unwrap();

        assert_eq!(request.uri().path(), "/v2/api/users/7");
    }

    #[test]
    fn test_path_segment_index_within_base_and_request_path() {
        // `/path` alone has one segment; with the base path there are two
        let client = client(Some(ApiVersionInserter::use_path_segment(2)), Some(1.2));

        let request = client.get("/path").build().unwrap();

        assert_eq!(request.uri().path(), "/api/path/1.2");
    }

    #[test]
    fn test_path_segment_out_of_range_names_full_path() {
        let client = client(Some(ApiVersionInserter::use_path_segment(3)), Some(1.2));

        let err = client.get("/path").build().unwrap_err();

        assert!(!err.is_misconfiguration());
        assert_eq!(
            err.to_string(),
            "Cannot insert version into '/api/path' at path segment index 3"
        );
    }

    #[test]
    fn test_query_passes_through_without_version() {
        let client = client(None, None);

        let request = client.get("/path?flag&x=a%20b").build().unwrap();

        assert_eq!(
            request.uri().to_string(),
            "http://localhost:8080/api/path?flag&x=a%20b"
        );
    }

    #[test]
    fn test_query_version_keeps_raw_params() {
        let client = client(Some(ApiVersionInserter::use_query_param("v").unwrap()), Some(1.2));

        let request = client.get("/path?flag&x=a%20b").build().unwrap();

        assert_eq!(
            request.uri().path_and_query().unwrap().as_str(),
            "/api/path?flag&x=a%20b&v=1.2"
        );
    }

    #[test]
    fn test_path_segment_rejects_slash_in_version() {
        let client = client(Some(ApiVersionInserter::use_path_segment(0)), None);

        let err = client.get("/path").api_version("v1/2").build().unwrap_err();

        assert!(matches!(
            err,
            ClientError::Insert(InsertError::InvalidPathSegment { .. })
        ));
    }

    #[test]
    fn test_default_headers_merge() {
        let client = Client::builder()
            .base_url("http://localhost")
            .default_header("Accept", "application/json")
            .default_header("X-Client", "apistamp")
            .build()
            .unwrap();

        let request = client
            .get("/path")
            .header("Accept", "text/plain")
            .build()
            .unwrap();

        let accept: Vec<_> = request.headers().get_all("accept").iter().collect();
        assert_eq!(accept, vec!["text/plain"]);
        assert_eq!(request.headers()["x-client"], "apistamp");
    }

    #[test]
    fn test_version_without_inserter_fails_at_build() {
        let client = client(None, Some(1.0));

        let err = client.get("/path").build().unwrap_err();

        assert!(matches!(err, ClientError::NoVersionInserter));
    }

    #[test]
    fn test_no_version_passes_through() {
        let client = client(Some(ApiVersionInserter::use_path_segment(5)), None);

        let request = client.get("/path").build().unwrap();

        assert_eq!(request.uri().path(), "/api/path");
    }

    #[test]
    fn test_invalid_header_reported() {
        let client = client(None, None);
        let err = client.get("/path").header("x-ok", "bad\nvalue").build().unwrap_err();
        assert!(matches!(err, ClientError::InvalidHeader(name) if name == "x-ok"));
    }
}
