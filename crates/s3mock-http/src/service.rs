//! The hyper `Service` for S3Mock.
//!
//! [`S3HttpService`] runs every request through the same pipeline:
//!
//! 1. Health probe interception (`GET /_health`, `GET /health`) for path-style hosts
//! 2. CORS preflight (`OPTIONS`)
//! 3. Routing via [`S3Router`]
//! 4. SigV2 header authentication, skipped for `POST` form uploads whose
//!    policy is checked by the operation layer
//! 5. Body collection
//! 6. Dispatch to the [`S3Handler`]
//! 7. Common response headers (`x-amz-request-id`, `Server`, CORS)

use std::convert::Infallible;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use http::header::HeaderValue;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::service::Service;
use s3mock_auth::Credentials;
use s3mock_core::S3MockConfig;
use s3mock_model::S3Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::body::S3ResponseBody;
use crate::dispatch::{S3Handler, dispatch_operation};
use crate::response::error_to_response;
use crate::router::S3Router;

const ALLOWED_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept";

/// Configuration for the HTTP layer.
#[derive(Clone)]
pub struct S3HttpConfig {
    /// Base domain for virtual-hosted-style requests (e.g. `s3.localhost`).
    pub domain: String,
    /// Whether `<bucket>.<domain>` hosts select a bucket.
    pub virtual_hosting: bool,
    /// Whether to skip header signature verification.
    pub skip_signature_validation: bool,
    /// The key pair request signatures are verified against.
    pub credentials: Credentials,
}

impl fmt::Debug for S3HttpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("S3HttpConfig")
            .field("domain", &self.domain)
            .field("virtual_hosting", &self.virtual_hosting)
            .field("skip_signature_validation", &self.skip_signature_validation)
            .field("access_key_id", &self.credentials.access_key_id())
            .finish_non_exhaustive()
    }
}

impl Default for S3HttpConfig {
    fn default() -> Self {
        Self::from(&S3MockConfig::default())
    }
}

impl From<&S3MockConfig> for S3HttpConfig {
    fn from(config: &S3MockConfig) -> Self {
        Self {
            domain: config.s3_domain.clone(),
            virtual_hosting: config.s3_virtual_hosting,
            skip_signature_validation: config.s3_skip_signature_validation,
            credentials: config.credentials(),
        }
    }
}

/// The S3 HTTP service.
#[derive(Debug)]
pub struct S3HttpService<H: S3Handler> {
    handler: Arc<H>,
    router: S3Router,
    config: Arc<S3HttpConfig>,
}

impl<H: S3Handler> S3HttpService<H> {
    /// Create a service with the given handler and configuration.
    #[must_use]
    pub fn new(handler: H, config: S3HttpConfig) -> Self {
        Self::from_shared(Arc::new(handler), config)
    }

    /// Create a service from a shared handler.
    #[must_use]
    pub fn from_shared(handler: Arc<H>, config: S3HttpConfig) -> Self {
        let router = S3Router::new(&config.domain, config.virtual_hosting);
        Self {
            handler,
            router,
            config: Arc::new(config),
        }
    }

    /// Handle one request with any body type.
    ///
    /// This never fails: errors are rendered as XML error responses.
    pub async fn handle<Bd>(&self, req: http::Request<Bd>) -> http::Response<S3ResponseBody>
    where
        Bd: http_body::Body<Data = Bytes> + Send,
        Bd::Error: fmt::Display,
    {
        let request_id = Uuid::new_v4().to_string();
        let response = process_request(
            req,
            self.handler.as_ref(),
            &self.router,
            &self.config,
            &request_id,
        )
        .await;
        add_common_headers(response, &request_id)
    }
}

impl<H: S3Handler> Clone for S3HttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            router: self.router.clone(),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: S3Handler> Service<http::Request<Incoming>> for S3HttpService<H> {
    type Response = http::Response<S3ResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

async fn process_request<H, Bd>(
    req: http::Request<Bd>,
    handler: &H,
    router: &S3Router,
    config: &S3HttpConfig,
    request_id: &str,
) -> http::Response<S3ResponseBody>
where
    H: S3Handler,
    Bd: http_body::Body<Data = Bytes>,
    Bd::Error: fmt::Display,
{
    let method = req.method().clone();
    let uri = req.uri().clone();
    debug!(%method, %uri, request_id, "processing S3 request");

    if is_health_check(&method, uri.path()) && router.virtual_bucket(req.headers()).is_none() {
        return health_check_response();
    }

    if method == http::Method::OPTIONS {
        return cors_preflight_response();
    }

    let (parts, incoming) = req.into_parts();
    let routing_result = router.resolve(&parts);

    if method != http::Method::POST && !config.skip_signature_validation {
        let virtual_bucket = router.virtual_bucket(&parts.headers);
        if let Err(auth_err) = s3mock_auth::verify_authorization(
            &parts,
            virtual_bucket.as_deref(),
            &config.credentials,
        ) {
            warn!(%method, %uri, error = %auth_err, request_id, "authentication failed");
            let s3_err = S3Error::authorization_failed().with_source(auth_err);
            return error_to_response(&s3_err);
        }
    }

    let ctx = match routing_result {
        Ok(ctx) => ctx,
        Err(err) => {
            warn!(%method, %uri, error = %err, request_id, "failed to route S3 request");
            return error_to_response(&err);
        }
    };

    info!(
        operation = %ctx.operation,
        bucket = ?ctx.resource.bucket(),
        key = ?ctx.resource.key(),
        request_id,
        "routed S3 request"
    );

    let body = match incoming.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            error!(error = %err, request_id, "failed to collect request body");
            let s3_err = S3Error::internal_error("Failed to read request body");
            return error_to_response(&s3_err);
        }
    };

    match dispatch_operation(handler, parts, body, ctx).await {
        Ok(response) => response,
        Err(err) => {
            debug!(error = %err, request_id, "S3 operation returned error");
            error_to_response(&err)
        }
    }
}

fn is_health_check(method: &http::Method, path: &str) -> bool {
    *method == http::Method::GET && (path == "/_health" || path == "/health")
}

fn health_check_response() -> http::Response<S3ResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
        .body(S3ResponseBody::from_static(
            r#"{"status":"running","service":"s3mock"}"#,
        ))
        .expect("static health response should be valid")
}

fn cors_preflight_response() -> http::Response<S3ResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(
            http::header::ACCESS_CONTROL_ALLOW_METHODS,
            "GET, PUT, POST, DELETE, HEAD, OPTIONS",
        )
        .header(http::header::ACCESS_CONTROL_MAX_AGE, "86400")
        .body(S3ResponseBody::empty())
        .expect("static CORS response should be valid")
}

/// Headers added to every response, errors included.
fn add_common_headers(
    mut response: http::Response<S3ResponseBody>,
    request_id: &str,
) -> http::Response<S3ResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = HeaderValue::from_str(request_id) {
        headers.insert("x-amz-request-id", hv);
    }
    headers.insert(http::header::SERVER, HeaderValue::from_static("S3Mock"));
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        http::header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    response
}
