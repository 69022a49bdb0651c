//! Bucket operation handlers: `list_buckets`, `create_bucket`, `delete_bucket`.

use s3mock_model::S3Error;
use s3mock_model::output::{CreateBucketOutput, DeleteBucketOutput, ListBucketsOutput};
use tracing::{debug, warn};

use super::{access_denied, require_bucket};
use crate::provider::S3Provider;
use crate::storage::StorageBackend;

impl<B: StorageBackend> S3Provider<B> {
    /// List every bucket.
    pub async fn handle_list_buckets(&self) -> Result<ListBucketsOutput, S3Error> {
        self.ready.wait().await.map_err(access_denied)?;
        let buckets = self.backend.list_buckets().await.map_err(access_denied)?;
        debug!(count = buckets.len(), "list_buckets completed");
        Ok(ListBucketsOutput { buckets })
    }

    /// Create a bucket. A name conflict surfaces as 403 with the backend message.
    pub async fn handle_create_bucket(
        &self,
        bucket: Option<&str>,
    ) -> Result<CreateBucketOutput, S3Error> {
        let bucket = require_bucket(bucket)?;
        self.ready.wait().await.map_err(access_denied)?;

        let id = self
            .backend
            .create_bucket(bucket)
            .await
            .map_err(access_denied)?;

        debug!(bucket = %bucket, id = %id, "create_bucket completed");
        Ok(CreateBucketOutput {
            location: format!("/{bucket}"),
        })
    }

    /// Delete a bucket. Every backend failure here is a 500 `Error`.
    pub async fn handle_delete_bucket(
        &self,
        bucket: Option<&str>,
    ) -> Result<DeleteBucketOutput, S3Error> {
        let bucket = require_bucket(bucket)?;

        let result = match self.ready.wait().await {
            Ok(()) => self.backend.delete_bucket(bucket).await,
            Err(e) => Err(e),
        };

        if let Err(err) = result {
            warn!(bucket = %bucket, error = %err, "delete_bucket failed");
            return Err(S3Error::internal_error(err.to_string()).with_source(err));
        }

        debug!(bucket = %bucket, "delete_bucket completed");
        Ok(DeleteBucketOutput)
    }
}
