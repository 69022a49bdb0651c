//! Storage backend error types.
//!
//! [`StorageError`] is what a [`crate::storage::StorageBackend`] reports. The
//! operation handlers in [`crate::ops`] translate it into a wire-level
//! [`s3mock_model::S3Error`]; the `Display` text becomes the error message.

/// Errors reported by a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The named bucket does not exist.
    #[error("Bucket not found: {bucket}")]
    NoSuchBucket {
        /// The bucket name that was not found.
        bucket: String,
    },

    /// A bucket with this name already exists.
    #[error("Bucket already exists")]
    BucketAlreadyExists {
        /// The conflicting bucket name.
        bucket: String,
    },

    /// The bucket still holds objects.
    #[error("Bucket is not empty: {bucket}")]
    BucketNotEmpty {
        /// The bucket name that is not empty.
        bucket: String,
    },

    /// The named object does not exist.
    #[error("File not found: {key}")]
    NoSuchKey {
        /// The key that was not found.
        key: String,
    },

    /// The backend never signalled readiness.
    #[error("Storage backend is not ready")]
    NotReady,

    /// Any other backend failure.
    #[error("Internal storage error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl StorageError {
    /// Whether the error reports a missing bucket or object.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSuchBucket { .. } | Self::NoSuchKey { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_classify_not_found_errors() {
        assert!(
            StorageError::NoSuchKey {
                key: "a".to_owned()
            }
            .is_not_found()
        );
        assert!(
            !StorageError::BucketAlreadyExists {
                bucket: "b".to_owned()
            }
            .is_not_found()
        );
    }

    #[test]
    fn test_should_wrap_anyhow_errors() {
        let err: StorageError = anyhow::anyhow!("disk on fire").into();
        assert_eq!(err.to_string(), "Internal storage error: disk on fire");
    }
}
