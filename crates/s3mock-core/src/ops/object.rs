//! Object operation handlers: get, head, put, delete and the form upload.

use bytes::Bytes;
use s3mock_model::S3Error;
use s3mock_model::output::{
    DeleteObjectOutput, GetObjectOutput, HeadObjectOutput, PostObjectOutput, PutObjectOutput,
    quote_etag,
};
use tracing::{debug, warn};

use super::{access_denied, require_bucket, require_key};
use crate::error::StorageError;
use crate::form::FormUpload;
use crate::provider::S3Provider;
use crate::storage::{BucketHandle, StorageBackend};

impl<B: StorageBackend> S3Provider<B> {
    async fn open_bucket(&self, bucket: &str) -> Result<B::Bucket, S3Error> {
        self.ready.wait().await.map_err(access_denied)?;
        self.backend.get_bucket(bucket).await.map_err(access_denied)
    }

    /// Read an object.
    ///
    /// `content_disposition` is the decoded `response-content-disposition`
    /// query value and is echoed back unchanged.
    pub async fn handle_get_object(
        &self,
        bucket: Option<&str>,
        key: Option<&str>,
        content_disposition: Option<String>,
    ) -> Result<GetObjectOutput, S3Error> {
        let bucket = require_bucket(bucket)?;
        let key = require_key(key)?;
        let handle = self.open_bucket(bucket).await?;

        let content = match handle.get_file(key).await {
            Ok(content) => content,
            Err(err @ StorageError::NoSuchKey { .. }) => {
                debug!(bucket = %bucket, key = %key, "get_object: no such key");
                return Err(S3Error::no_such_key().with_source(err));
            }
            Err(err) => return Err(access_denied(err)),
        };

        debug!(bucket = %bucket, key = %key, size = content.body.len(), "get_object completed");
        Ok(GetObjectOutput {
            body: content.body,
            content_type: content.mime_type,
            content_disposition,
        })
    }

    /// Report an object's ETag.
    pub async fn handle_head_object(
        &self,
        bucket: Option<&str>,
        key: Option<&str>,
    ) -> Result<HeadObjectOutput, S3Error> {
        let bucket = require_bucket(bucket)?;
        let key = require_key(key)?;
        let handle = self.open_bucket(bucket).await?;

        let hash = handle.get_content_hash(key).await.map_err(access_denied)?;
        Ok(HeadObjectOutput {
            e_tag: quote_etag(&hash),
        })
    }

    /// Store an object from the request body.
    pub async fn handle_put_object(
        &self,
        bucket: Option<&str>,
        key: Option<&str>,
        body: Bytes,
    ) -> Result<PutObjectOutput, S3Error> {
        let bucket = require_bucket(bucket)?;
        let key = require_key(key)?;
        let handle = self.open_bucket(bucket).await?;

        let stored = handle.insert_file(key, body).await.map_err(access_denied)?;
        debug!(bucket = %bucket, key = %key, size = stored.size, "put_object completed");
        Ok(PutObjectOutput {
            e_tag: quote_etag(&stored.content_hash),
        })
    }

    /// Delete an object.
    pub async fn handle_delete_object(
        &self,
        bucket: Option<&str>,
        key: Option<&str>,
    ) -> Result<DeleteObjectOutput, S3Error> {
        let bucket = require_bucket(bucket)?;
        let key = require_key(key)?;
        let handle = self.open_bucket(bucket).await?;

        handle.delete_file(key).await.map_err(access_denied)?;
        debug!(bucket = %bucket, key = %key, "delete_object completed");
        Ok(DeleteObjectOutput)
    }

    /// Store the file of a browser form upload.
    ///
    /// The form's policy fields are verified before any backend call. The
    /// returned location is `{base_url}/{key}`.
    pub async fn handle_post_object(
        &self,
        bucket: Option<&str>,
        form: FormUpload,
        base_url: &str,
    ) -> Result<PostObjectOutput, S3Error> {
        let bucket = require_bucket(bucket)?;

        if form.file().is_none() {
            warn!(bucket = %bucket, "form upload without a file part");
            return Err(S3Error::access_denied("File part required"));
        }

        if let Err(err) = self.policy.authorize(bucket, form.fields()) {
            warn!(bucket = %bucket, error = %err, "form upload policy rejected");
            return Err(S3Error::authorization_failed().with_source(err));
        }

        let (fields, file) = form.into_parts();
        let key = require_key(fields.get("key").map(String::as_str))?;
        let Some(file) = file else {
            return Err(S3Error::access_denied("File part required"));
        };

        let handle = self.open_bucket(bucket).await?;
        let stored = handle
            .insert_file(key, file.data)
            .await
            .map_err(access_denied)?;

        debug!(bucket = %bucket, key = %key, size = stored.size, "post_object completed");
        Ok(PostObjectOutput {
            e_tag: quote_etag(&stored.content_hash),
            location: format!("{base_url}/{key}"),
        })
    }
}
