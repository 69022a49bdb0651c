//! Operation dispatch.
//!
//! [`S3Handler`] is the boundary between the HTTP layer and the operation
//! layer. It is implemented here for [`S3Provider`], which owns the storage
//! backend, the readiness gate and the form upload policy.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use s3mock_core::{S3Provider, StorageBackend};
use s3mock_model::{S3Error, S3Operation};

use crate::body::S3ResponseBody;
use crate::form::read_form;
use crate::response::IntoS3Response;
use crate::router::RoutingContext;

/// Boxed response future returned by [`S3Handler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<S3ResponseBody>, S3Error>> + Send>>;

/// Executes routed operations.
pub trait S3Handler: Send + Sync + 'static {
    /// Handle a routed operation and produce an HTTP response.
    fn handle_operation(
        &self,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture;
}

impl<B: StorageBackend> S3Handler for S3Provider<B> {
    fn handle_operation(
        &self,
        parts: http::request::Parts,
        body: Bytes,
        ctx: RoutingContext,
    ) -> HandlerFuture {
        let provider = self.clone();
        Box::pin(async move { execute(&provider, &parts, body, &ctx).await })
    }
}

async fn execute<B: StorageBackend>(
    provider: &S3Provider<B>,
    parts: &http::request::Parts,
    body: Bytes,
    ctx: &RoutingContext,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    let bucket = ctx.resource.bucket();
    let key = ctx.resource.key();

    match ctx.operation {
        S3Operation::ListBuckets => provider.handle_list_buckets().await?.into_s3_response(),
        S3Operation::CreateBucket => provider
            .handle_create_bucket(bucket)
            .await?
            .into_s3_response(),
        S3Operation::DeleteBucket => provider
            .handle_delete_bucket(bucket)
            .await?
            .into_s3_response(),
        S3Operation::GetObject => {
            let disposition = ctx
                .query_value("response-content-disposition")
                .map(str::to_owned);
            provider
                .handle_get_object(bucket, key, disposition)
                .await?
                .into_s3_response()
        }
        S3Operation::HeadObject => provider
            .handle_head_object(bucket, key)
            .await?
            .into_s3_response(),
        S3Operation::PutObject => provider
            .handle_put_object(bucket, key, body)
            .await?
            .into_s3_response(),
        S3Operation::DeleteObject => provider
            .handle_delete_object(bucket, key)
            .await?
            .into_s3_response(),
        S3Operation::PostObject => {
            let form = read_form(&parts.headers, &body)?;
            provider
                .handle_post_object(bucket, form, &location_base(parts))
                .await?
                .into_s3_response()
        }
    }
}

/// The absolute URL a form upload was posted to: `http://{host}{path}`.
fn location_base(parts: &http::request::Parts) -> String {
    let host = parts
        .headers
        .get(http::header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| parts.uri.authority().map(http::uri::Authority::as_str))
        .unwrap_or_default();
    let path = parts
        .uri
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str);
    format!("http://{host}{path}")
}

/// Dispatch a routed request to the handler.
///
/// # Errors
///
/// Returns the handler's error unchanged.
pub async fn dispatch_operation<H: S3Handler>(
    handler: &H,
    parts: http::request::Parts,
    body: Bytes,
    ctx: RoutingContext,
) -> Result<http::Response<S3ResponseBody>, S3Error> {
    tracing::debug!(
        operation = %ctx.operation,
        bucket = ?ctx.resource.bucket(),
        key = ?ctx.resource.key(),
        "dispatching S3 operation"
    );
    handler.handle_operation(parts, body, ctx).await
}
