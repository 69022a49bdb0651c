//! S3 operation handlers.
//!
//! Each submodule adds `handle_*` methods to [`crate::provider::S3Provider`].
//! Handlers validate the request shape first, then wait for the backend to be
//! ready, then call it. Backend errors are translated here and never leave
//! this layer as [`StorageError`]:
//!
//! | Failure | Status | Code |
//! |---------|--------|------|
//! | missing bucket / key segment | 403 | `Access Denied` |
//! | any backend error (default) | 403 | `Access Denied` |
//! | bucket deletion | 500 | `Error` |
//! | object fetch, key not found | 404 | `NoSuchKey` |

pub mod bucket;
pub mod object;

use s3mock_model::S3Error;
use tracing::debug;

use crate::error::StorageError;

/// Require a bucket name, failing before any backend call.
pub(crate) fn require_bucket(bucket: Option<&str>) -> Result<&str, S3Error> {
    bucket
        .filter(|b| !b.is_empty())
        .ok_or_else(S3Error::bucket_name_required)
}

/// Require an object key, failing before any backend call.
pub(crate) fn require_key(key: Option<&str>) -> Result<&str, S3Error> {
    key.filter(|k| !k.is_empty())
        .ok_or_else(S3Error::key_name_required)
}

/// The default translation: 403 `Access Denied` carrying the backend message.
pub(crate) fn access_denied(err: StorageError) -> S3Error {
    debug!(error = %err, "backend error mapped to Access Denied");
    S3Error::access_denied(err.to_string()).with_source(err)
}
