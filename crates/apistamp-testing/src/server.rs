use super::expectation::{Expectation, MockResponse, Times};
use super::matcher::RequestMatcher;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};

type GenericError = Box<dyn std::error::Error + Send + Sync>;
type Result<T> = std::result::Result<T, GenericError>;

/// How long [`MockServer::take_request`] waits before failing the test
const TAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// A recording mock HTTP server
///
/// Every request is recorded in arrival order. A request is answered by the
/// most recently added matching expectation, else by the next enqueued
/// response, else with `404 Not Found`.
pub struct MockServer {
    addr: SocketAddr,
    state: Arc<Mutex<ServerState>>,
    received: tokio::sync::Mutex<mpsc::UnboundedReceiver<RecordedRequest>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

struct ServerState {
    expectations: Vec<Expectation>,
    queue: VecDeque<MockResponse>,
    unmatched_requests: Vec<RecordedRequest>,
    received_tx: mpsc::UnboundedSender<RecordedRequest>,
}

/// A request as seen by the server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: http::Method,
    /// Path including the query string, e.g. `/path?api-version=1.2`
    pub path: String,
    pub headers: http::HeaderMap,
    pub body: Bytes,
}

impl RecordedRequest {
    /// Path without the query string
    pub fn path_only(&self) -> &str {
        self.path.split_once('?').map_or(self.path.as_str(), |(p, _)| p)
    }

    /// Raw query string, if any
    pub fn query(&self) -> Option<&str> {
        self.path.split_once('?').map(|(_, q)| q)
    }

    /// Decoded query parameters in order
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query()
            .and_then(|q| serde_urlencoded::from_str(q).ok())
            .unwrap_or_default()
    }

    /// First value of header `name` as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

impl MockServer {
    /// Start a new mock server on a random port
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (received_tx, received_rx) = mpsc::unbounded_channel();
        let state = Arc::new(Mutex::new(ServerState {
            expectations: Vec::new(),
            queue: VecDeque::new(),
            unmatched_requests: Vec::new(),
            received_tx,
        }));

        let state_clone = state.clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut stop_future = shutdown_rx;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let state = state_clone.clone();

                                tokio::spawn(async move {
                                    if let Err(err) = hyper_util::server::conn::auto::Builder::new(hyper_util::rt::TokioExecutor::new())
                                        .serve_connection(io, service_fn(move |req| handle_request(req, state.clone())))
                                        .await
                                    {
                                        tracing::debug!(error = %err, "Mock server connection closed with error");
                                    }
                                });
                            }
                            Err(e) => tracing::warn!(error = %e, "Mock server accept error"),
                        }
                    }
                    _ = &mut stop_future => {
                        break;
                    }
                }
            }
        });

        Self {
            addr,
            state,
            received: tokio::sync::Mutex::new(received_rx),
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL of the server, e.g. `http://127.0.0.1:40123`
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// URL for `path` on this server
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Queue a response for the next request no expectation matches
    pub fn enqueue(&self, response: MockResponse) {
        self.state.lock().unwrap().queue.push_back(response);
    }

    /// Wait for the next recorded request, in arrival order
    ///
    /// # Panics
    ///
    /// Panics if no request arrives within five seconds.
    pub async fn take_request(&self) -> RecordedRequest {
        let mut received = self.received.lock().await;
        match tokio::time::timeout(TAKE_TIMEOUT, received.recv()).await {
            Ok(Some(request)) => request,
            _ => panic!("No request received within {:?}", TAKE_TIMEOUT),
        }
    }

    /// Next recorded request if one has already arrived
    pub fn try_take_request(&self) -> Option<RecordedRequest> {
        self.received.try_lock().ok()?.try_recv().ok()
    }

    /// Get requests that matched no expectation and found no queued response
    pub fn unmatched_requests(&self) -> Vec<RecordedRequest> {
        let state = self.state.lock().unwrap();
        state.unmatched_requests.clone()
    }

    /// Add an expectation
    pub fn expect(&self, matcher: RequestMatcher) -> ExpectationBuilder {
        ExpectationBuilder {
            server: self.state.clone(),
            expectation: Some(Expectation::new(matcher)),
        }
    }

    /// Verify that all expectations were met
    ///
    /// # Panics
    ///
    /// Panics describing the first unmet expectation.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        for exp in &state.expectations {
            if let Err(msg) = exp.check() {
                panic!("{}", msg);
            }
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Registers its expectation with the server when dropped
pub struct ExpectationBuilder {
    server: Arc<Mutex<ServerState>>,
    expectation: Option<Expectation>,
}

impl ExpectationBuilder {
    pub fn respond_with(mut self, response: MockResponse) -> Self {
        if let Some(exp) = self.expectation.take() {
            self.expectation = Some(exp.respond_with(response));
        }
        self
    }

    pub fn times(self, n: usize) -> Self {
        self.with_times(Times::Exactly(n))
    }

    pub fn once(self) -> Self {
        self.with_times(Times::Once)
    }

    pub fn at_least_once(self) -> Self {
        self.with_times(Times::AtLeast(1))
    }

    pub fn never(self) -> Self {
        self.with_times(Times::Exactly(0))
    }

    fn with_times(mut self, times: Times) -> Self {
        if let Some(exp) = self.expectation.take() {
            self.expectation = Some(exp.times(times));
        }
        self
    }
}

impl Drop for ExpectationBuilder {
    fn drop(&mut self) {
        if let Some(exp) = self.expectation.take() {
            let mut state = self.server.lock().unwrap();
            state.expectations.push(exp);
        }
    }
}

async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<Mutex<ServerState>>,
) -> Result<Response<Full<Bytes>>> {
    let (parts, body) = req.into_parts();
    let body_bytes = body.collect().await?.to_bytes();

    let recorded = RecordedRequest {
        method: parts.method,
        path: parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), |pq| pq.as_str().to_string()),
        headers: parts.headers,
        body: body_bytes,
    };

    let mut state_guard = state.lock().unwrap();
    let _ = state_guard.received_tx.send(recorded.clone());

    // Later expectations override earlier ones
    let matching_idx = state_guard
        .expectations
        .iter()
        .rposition(|exp| exp.matcher.matches(&recorded));

    let resp_def = if let Some(idx) = matching_idx {
        let exp = &mut state_guard.expectations[idx];
        exp.call_count += 1;
        Some(exp.response.clone())
    } else {
        state_guard.queue.pop_front()
    };

    let Some(resp_def) = resp_def else {
        state_guard.unmatched_requests.push(recorded);
        return Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("No expectation matched")))?);
    };

    let mut response = Response::builder().status(resp_def.status);
    for (k, v) in &resp_def.headers {
        response = response.header(k, v);
    }
    Ok(response.body(Full::new(resp_def.body))?)
}
