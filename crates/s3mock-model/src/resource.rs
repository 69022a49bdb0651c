//! The bucket/key pair extracted from a request target.

/// Bucket name and object key of a request, both percent-decoded.
///
/// An empty path segment is represented as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResource {
    /// The bucket name, if the first path segment is non-empty.
    pub bucket: Option<String>,
    /// The object key, if the second path segment is non-empty.
    pub key: Option<String>,
}

impl ParsedResource {
    /// Create a resource from optional parts.
    #[must_use]
    pub fn new(bucket: Option<String>, key: Option<String>) -> Self {
        Self { bucket, key }
    }

    /// The bucket name as a string slice.
    #[must_use]
    pub fn bucket(&self) -> Option<&str> {
        self.bucket.as_deref()
    }

    /// The object key as a string slice.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }
}
