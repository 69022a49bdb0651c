//! The set of operations the emulator routes to.

use std::fmt;

/// A routed S3 operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S3Operation {
    /// `GET /`
    ListBuckets,
    /// `PUT /{bucket}`
    CreateBucket,
    /// `DELETE /{bucket}`
    DeleteBucket,
    /// `GET /{bucket}/{key}`
    GetObject,
    /// `HEAD /{bucket}/{key}`
    HeadObject,
    /// `PUT /{bucket}/{key}`
    PutObject,
    /// `DELETE /{bucket}/{key}`
    DeleteObject,
    /// `POST /{bucket}` with a `multipart/form-data` body.
    PostObject,
}

impl S3Operation {
    /// Returns the operation name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListBuckets => "ListBuckets",
            Self::CreateBucket => "CreateBucket",
            Self::DeleteBucket => "DeleteBucket",
            Self::GetObject => "GetObject",
            Self::HeadObject => "HeadObject",
            Self::PutObject => "PutObject",
            Self::DeleteObject => "DeleteObject",
            Self::PostObject => "PostObject",
        }
    }

    /// Whether the operation addresses a single object.
    #[must_use]
    pub fn is_object_operation(&self) -> bool {
        matches!(
            self,
            Self::GetObject | Self::HeadObject | Self::PutObject | Self::DeleteObject
        )
    }
}

impl fmt::Display for S3Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
