//! Mutable request representation
//!
//! [`RequestParts`] is what a client builds up for one outgoing request
//! before handing it to a transport. The path is held as a list of
//! segments so that a version can be inserted at a precise position.

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::uri::{PathAndQuery, Uri};
use http::{HeaderMap, Method, Request};
use http_body_util::Full;

/// Request under construction
#[derive(Debug, Clone)]
pub struct RequestParts {
    method: Method,
    segments: Vec<String>,
    query: Option<String>,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestParts {
    /// Create a request for `method` on `uri`
    ///
    /// `uri` is a path with an optional query string (`/users/1?expand=true`).
    /// Empty path segments are dropped. The query string is kept verbatim.
    pub fn new(method: Method, uri: &str) -> Self {
        let (path, query) = match uri.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (uri, None),
        };

        Self {
            method,
            segments: split_segments(path),
            query: query.filter(|q| !q.is_empty()).map(str::to_string),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// HTTP method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Path segments, without separators
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Mutable access to the path segments
    pub fn segments_mut(&mut self) -> &mut Vec<String> {
        &mut self.segments
    }

    /// Put the segments of `prefix` in front of the current path
    ///
    /// A client uses this to resolve a request path under its base URL's
    /// path, so `/api` and `/users` give `/api/users`.
    pub fn prefix_path(&mut self, prefix: &str) {
        let mut segments = split_segments(prefix);
        segments.append(&mut self.segments);
        self.segments = segments;
    }

    /// Raw query string, without the leading `?`
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Append a query parameter
    ///
    /// Only the new pair is encoded; the existing query string is left as is.
    pub fn append_query(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let pair: [(String, String); 1] = [(name.into(), value.into())];
        // Serializing a list of string pairs cannot fail
        let pair = serde_urlencoded::to_string(&pair[..]).unwrap_or_default();
        match &mut self.query {
            Some(query) => {
                query.push('&');
                query.push_str(&pair);
            }
            None => self.query = Some(pair),
        }
    }

    /// Decoded query parameters in order, repeated names allowed
    ///
    /// A key without `=` decodes to an empty value.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        match &self.query {
            // Form decoding into owned string pairs is lossy, never failing
            Some(query) => serde_urlencoded::from_str(query).unwrap_or_default(),
            None => Vec::new(),
        }
    }

    /// Decoded values of query parameter `name`, in order
    pub fn query_values(&self, name: &str) -> Vec<String> {
        self.query_pairs()
            .into_iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v)
            .collect()
    }

    /// Request headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable request headers
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Append a header, keeping existing values for the same name
    pub fn append_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.append(name, value);
    }

    /// Request body
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Replace the request body
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        self.body = body.into();
    }

    /// Render the path, e.g. `/v1/users`; `/` when there are no segments
    pub fn path(&self) -> String {
        render_path(&self.segments)
    }

    /// Render the path followed by `?` and the query string, if any
    pub fn path_and_query(&self) -> String {
        let path = self.path();
        match &self.query {
            Some(query) => format!("{}?{}", path, query),
            None => path,
        }
    }

    /// Build the final `http::Request` against `base`
    ///
    /// Only the scheme and authority of `base` are used. The request path is
    /// sent as it stands, so a base path must already be applied with
    /// [`prefix_path`](Self::prefix_path).
    pub fn into_request(self, base: &Uri) -> Result<Request<Full<Bytes>>, http::Error> {
        let path_and_query: PathAndQuery = self.path_and_query().parse()?;

        let mut parts = base.clone().into_parts();
        parts.path_and_query = Some(path_and_query);
        let uri = Uri::from_parts(parts)?;

        let mut builder = Request::builder().method(self.method).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            *headers = self.headers;
        }
        builder.body(Full::new(self.body))
    }
}

/// Split a path into its non-empty segments
pub(crate) fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join segments back into an absolute path
pub(crate) fn render_path(segments: &[String]) -> String {
    format!("/{}", segments.join("/"))
}
