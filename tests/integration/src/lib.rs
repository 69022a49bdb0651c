//! Integration tests for the S3Mock server.
//!
//! These tests require a running server at `localhost:7000` using the default
//! `key`/`secret` credentials. They are marked `#[ignore]` so they don't run
//! during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! cargo test -p s3mock-integration -- --ignored
//! ```

use std::sync::Once;

use bytes::Bytes;
use s3mock_auth::{Credentials, Signer};

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Endpoint URL for the server.
#[must_use]
pub fn endpoint_url() -> String {
    std::env::var("S3_ENDPOINT_URL").unwrap_or_else(|_| "http://localhost:7000".to_owned())
}

/// Credentials the server is expected to run with.
#[must_use]
pub fn credentials() -> Credentials {
    Credentials::new("key", "secret")
}

/// A minimal SigV2-signing client for path-style requests.
#[derive(Debug, Clone)]
pub struct S3Client {
    http: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
}

impl S3Client {
    /// Send a signed request. `path` includes the query string, if any.
    pub async fn send(
        &self,
        method: http::Method,
        path: &str,
        headers: &[(&str, &str)],
        body: impl Into<Bytes>,
    ) -> reqwest::Response {
        let mut builder = http::Request::builder().method(method.clone()).uri(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder
            .body(())
            .unwrap_or_else(|e| panic!("invalid request {path}: {e}"))
            .into_parts();
        let authorization = Signer::new(&parts).authorization(&self.credentials);

        let mut req = self
            .http
            .request(method, format!("{}{path}", self.endpoint))
            .header(http::header::AUTHORIZATION, authorization)
            .body(body.into());
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        req.send()
            .await
            .unwrap_or_else(|e| panic!("request to {path} failed: {e}"))
    }

    /// Send an unsigned request.
    pub async fn send_unsigned(
        &self,
        method: http::Method,
        path: &str,
        headers: &[(&str, &str)],
        body: impl Into<Bytes>,
    ) -> reqwest::Response {
        let mut req = self
            .http
            .request(method, format!("{}{path}", self.endpoint))
            .body(body.into());
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        req.send()
            .await
            .unwrap_or_else(|e| panic!("request to {path} failed: {e}"))
    }
}

/// Create a client pointing at the local server.
#[must_use]
pub fn s3_client() -> S3Client {
    init_tracing();

    S3Client {
        http: reqwest::Client::new(),
        endpoint: endpoint_url(),
        credentials: credentials(),
    }
}

/// Generate a unique bucket name for a test.
#[must_use]
pub fn test_bucket_name(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    format!("test-{prefix}-{id}")
}

/// Create a bucket and return its name. Caller is responsible for cleanup.
pub async fn create_test_bucket(client: &S3Client, prefix: &str) -> String {
    let name = test_bucket_name(prefix);
    let resp = client
        .send(http::Method::PUT, &format!("/{name}"), &[], Bytes::new())
        .await;
    assert_eq!(resp.status(), http::StatusCode::OK, "create bucket {name}");
    name
}

/// Delete the given objects, then the bucket.
pub async fn cleanup_bucket(client: &S3Client, bucket: &str, keys: &[&str]) {
    for key in keys {
        let _ = client
            .send(
                http::Method::DELETE,
                &format!("/{bucket}/{key}"),
                &[],
                Bytes::new(),
            )
            .await;
    }
    let _ = client
        .send(http::Method::DELETE, &format!("/{bucket}"), &[], Bytes::new())
        .await;
}

mod test_bucket;
mod test_error;
mod test_form;
mod test_object;
