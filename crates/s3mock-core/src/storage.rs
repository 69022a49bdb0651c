//! The storage backend contract.
//!
//! The operation layer talks to storage only through these two traits. A
//! backend owns all durable state and any serialization needed to keep it
//! consistent; the operation layer never locks.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use s3mock_model::BucketSummary;

use crate::error::StorageError;

/// Identifier assigned to a bucket at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BucketId(pub u64);

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of storing an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    /// Hex content hash, used as the ETag.
    pub content_hash: String,
    /// Stored size in bytes.
    pub size: u64,
}

/// A stored object's bytes and MIME type.
#[derive(Debug, Clone)]
pub struct ObjectContent {
    /// Object bytes.
    pub body: Bytes,
    /// MIME type of the object.
    pub mime_type: String,
}

/// Bucket-level storage operations.
#[async_trait]
pub trait StorageBackend: Send + Sync + 'static {
    /// Handle type returned by [`StorageBackend::get_bucket`].
    type Bucket: BucketHandle;

    /// Prepare the backend. Called once at startup before readiness is signalled.
    async fn initialize(&self) -> Result<(), StorageError>;

    /// Create a bucket.
    ///
    /// # Errors
    ///
    /// [`StorageError::BucketAlreadyExists`] when the name is taken. Exactly one
    /// of several concurrent creations of the same name succeeds.
    async fn create_bucket(&self, name: &str) -> Result<BucketId, StorageError>;

    /// Delete a bucket.
    async fn delete_bucket(&self, name: &str) -> Result<(), StorageError>;

    /// List every bucket.
    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, StorageError>;

    /// Open a bucket for object operations.
    ///
    /// # Errors
    ///
    /// [`StorageError::NoSuchBucket`] when the bucket does not exist.
    async fn get_bucket(&self, name: &str) -> Result<Self::Bucket, StorageError>;
}

/// Object-level storage operations on one bucket.
#[async_trait]
pub trait BucketHandle: Send + Sync {
    /// The bucket's name.
    fn name(&self) -> &str;

    /// Store `body` under `key`, replacing any existing object.
    async fn insert_file(&self, key: &str, body: Bytes) -> Result<StoredObject, StorageError>;

    /// Read an object.
    ///
    /// # Errors
    ///
    /// [`StorageError::NoSuchKey`] when the key does not exist.
    async fn get_file(&self, key: &str) -> Result<ObjectContent, StorageError>;

    /// Delete an object.
    async fn delete_file(&self, key: &str) -> Result<(), StorageError>;

    /// Hex content hash of an object.
    ///
    /// # Errors
    ///
    /// [`StorageError::NoSuchKey`] when the key does not exist.
    async fn get_content_hash(&self, key: &str) -> Result<String, StorageError>;
}
