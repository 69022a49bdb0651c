//! Typed outputs of each operation, serialized by `s3mock-http`.

use bytes::Bytes;

use crate::types::BucketSummary;

/// Output of `ListBuckets`.
#[derive(Debug, Clone, Default)]
pub struct ListBucketsOutput {
    /// All buckets known to the backend.
    pub buckets: Vec<BucketSummary>,
}

/// Output of `CreateBucket`.
#[derive(Debug, Clone)]
pub struct CreateBucketOutput {
    /// `/{bucket}`, echoed in the `Location` header.
    pub location: String,
}

/// Output of `DeleteBucket`.
#[derive(Debug, Clone, Default)]
pub struct DeleteBucketOutput;

/// Output of `GetObject`.
#[derive(Debug, Clone)]
pub struct GetObjectOutput {
    /// Object bytes.
    pub body: Bytes,
    /// MIME type reported by the backend.
    pub content_type: String,
    /// Value of the `response-content-disposition` override, if requested.
    pub content_disposition: Option<String>,
}

/// Output of `HeadObject`.
#[derive(Debug, Clone)]
pub struct HeadObjectOutput {
    /// Quoted content hash.
    pub e_tag: String,
}

/// Output of `PutObject`.
#[derive(Debug, Clone)]
pub struct PutObjectOutput {
    /// Quoted content hash.
    pub e_tag: String,
}

/// Output of `DeleteObject`.
#[derive(Debug, Clone, Default)]
pub struct DeleteObjectOutput;

/// Output of a form upload (`PostObject`).
#[derive(Debug, Clone)]
pub struct PostObjectOutput {
    /// Quoted content hash.
    pub e_tag: String,
    /// Absolute URL of the stored object.
    pub location: String,
}

/// Wrap a raw hex digest in the double quotes S3 uses for `ETag` values.
#[must_use]
pub fn quote_etag(hash: &str) -> String {
    format!("\"{hash}\"")
}
