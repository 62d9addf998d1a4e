//! Sending API versions over the wire

use apistamp_client::{Client, ClientBuilder, ClientError, ClientResponse, Transport};
use apistamp_core::{ApiVersionInserter, BoxError, InsertError};
use apistamp_testing::{MockResponse, MockServer, RecordedRequest};
use async_trait::async_trait;
use bytes::Bytes;
use http::{Request, StatusCode};
use http_body_util::Full;
use std::sync::{Arc, Mutex};

struct Fixture {
    server: MockServer,
}

impl Fixture {
    async fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let server = MockServer::start().await;
        server.enqueue(MockResponse::text("body"));
        Self { server }
    }

    fn builder(&self) -> ClientBuilder {
        Client::builder().base_url(self.server.base_url())
    }

    async fn perform_request(&self, inserter: ApiVersionInserter) -> Result<(), ClientError> {
        let client = self.builder().api_version_inserter(inserter).build()?;
        let response = client.get("/path").api_version(1.2).send().await?;
        assert_eq!(response.text(), "body");
        Ok(())
    }

    async fn expect_request(&self) -> RecordedRequest {
        self.server.take_request().await
    }
}

#[tokio::test]
async fn header() {
    let fixture = Fixture::new().await;
    fixture
        .perform_request(ApiVersionInserter::use_header("X-API-Version").unwrap())
        .await
        .unwrap();

    let request = fixture.expect_request().await;
    assert_eq!(request.header("X-API-Version"), Some("1.2"));
}

#[tokio::test]
async fn query_param() {
    let fixture = Fixture::new().await;
    fixture
        .perform_request(ApiVersionInserter::use_query_param("api-version").unwrap())
        .await
        .unwrap();

    assert_eq!(fixture.expect_request().await.path, "/path?api-version=1.2");
}

#[tokio::test]
async fn path_segment_index_less_than_size() {
    let fixture = Fixture::new().await;
    let inserter = ApiVersionInserter::builder()
        .use_path_segment(0)
        .with_version_formatter(|v| format!("v{}", v))
        .build()
        .unwrap();

    fixture.perform_request(inserter).await.unwrap();

    assert_eq!(fixture.expect_request().await.path, "/v1.2/path");
}

#[tokio::test]
async fn path_segment_index_equal_to_size() {
    let fixture = Fixture::new().await;
    let inserter = ApiVersionInserter::builder()
        .use_path_segment(1)
        .with_version_formatter(|v| format!("v{}", v))
        .build()
        .unwrap();

    fixture.perform_request(inserter).await.unwrap();

    assert_eq!(fixture.expect_request().await.path, "/path/v1.2");
}

#[tokio::test]
async fn path_segment_index_greater_than_size() {
    let fixture = Fixture::new().await;

    let err = fixture
        .perform_request(ApiVersionInserter::use_path_segment(2))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClientError::Insert(InsertError::PathSegmentOutOfRange { .. })
    ));
    assert_eq!(
        err.to_string(),
        "Cannot insert version into '/path' at path segment index 2"
    );
    assert!(fixture.server.try_take_request().is_none());
}

#[tokio::test]
async fn default_version() {
    let fixture = Fixture::new().await;
    let client = fixture
        .builder()
        .default_api_version(1.2)
        .api_version_inserter(ApiVersionInserter::use_header("X-API-Version").unwrap())
        .build()
        .unwrap();

    client.get("/path").send().await.unwrap();

    let request = fixture.expect_request().await;
    assert_eq!(request.header("X-API-Version"), Some("1.2"));
}

#[tokio::test]
async fn request_version_overrides_default() {
    let fixture = Fixture::new().await;
    fixture.server.enqueue(MockResponse::text("body"));
    let client = fixture
        .builder()
        .default_api_version(1.2)
        .api_version_inserter(ApiVersionInserter::use_header("X-API-Version").unwrap())
        .build()
        .unwrap();

    client.get("/path").api_version(2.0).send().await.unwrap();
    client.get("/path").send().await.unwrap();

    let values = |r: &RecordedRequest| -> Vec<String> {
        r.headers
            .get_all("x-api-version")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(values(&fixture.expect_request().await), vec!["2"]);
    assert_eq!(values(&fixture.expect_request().await), vec!["1.2"]);
}

#[tokio::test]
async fn version_without_inserter() {
    let fixture = Fixture::new().await;
    let client = fixture.builder().build().unwrap();

    let err = client.get("/path").api_version(1.2).send().await.unwrap_err();

    assert!(matches!(err, ClientError::NoVersionInserter));
    assert!(err.is_misconfiguration());
    assert!(fixture.server.try_take_request().is_none());
}

#[tokio::test]
async fn no_version_sends_request_unchanged() {
    let fixture = Fixture::new().await;
    let client = fixture
        .builder()
        .api_version_inserter(ApiVersionInserter::use_query_param("api-version").unwrap())
        .build()
        .unwrap();

    let response = client.get("/path?page=2").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let request = fixture.expect_request().await;
    assert_eq!(request.path, "/path?page=2");
    assert!(request.header("api-version").is_none());
}

/// Transport that records requests instead of sending them
#[derive(Clone, Default)]
struct RecordingTransport {
    sent: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: Request<Full<Bytes>>) -> Result<ClientResponse, BoxError> {
        self.sent.lock().unwrap().push(request.uri().to_string());
        Ok(ClientResponse::new(StatusCode::NO_CONTENT, Default::default(), Bytes::new()))
    }
}

#[tokio::test]
async fn custom_transport_sees_final_request() {
    let transport = RecordingTransport::default();
    let client = Client::builder()
        .base_url("http://api.example.com/base")
        .default_api_version("2024-06-01")
        .api_version_inserter(ApiVersionInserter::use_query_param("api-version").unwrap())
        .transport(transport.clone())
        .build()
        .unwrap();

    let response = client.delete("/items/9").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        *transport.sent.lock().unwrap(),
        vec!["http://api.example.com/base/items/9?api-version=2024-06-01".to_string()]
    );
}
