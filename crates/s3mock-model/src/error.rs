//! S3 error codes and the wire-level error value.
//!
//! The emulated service only ever answers with a handful of error codes. Note
//! that the access-denied code is the literal string `Access Denied` (with a
//! space), which is what clients of this server match on.

use std::fmt;

/// Error codes produced by the emulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum S3ErrorCode {
    /// Authentication failure, missing bucket name, or a backend error on
    /// most bucket/object operations.
    AccessDenied,
    /// The requested object key does not exist (object fetch only).
    NoSuchKey,
    /// Generic server-side failure, used for bucket deletion errors and
    /// request body read failures.
    InternalError,
    /// The method/path combination has no route.
    MethodNotAllowed,
}

impl S3ErrorCode {
    /// Returns the error code as written into the `<Code>` element.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "Access Denied",
            Self::NoSuchKey => "NoSuchKey",
            Self::InternalError => "Error",
            Self::MethodNotAllowed => "MethodNotAllowed",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::AccessDenied => http::StatusCode::FORBIDDEN,
            Self::NoSuchKey => http::StatusCode::NOT_FOUND,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Returns the default message for this error.
    #[must_use]
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::AccessDenied => "Access Denied",
            Self::NoSuchKey => "The specified key does not exist.",
            Self::InternalError => "Internal server error",
            Self::MethodNotAllowed => "The specified method is not allowed against this resource",
        }
    }
}

impl fmt::Display for S3ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An S3 error response.
#[derive(Debug)]
pub struct S3Error {
    /// The error code.
    pub code: S3ErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for S3Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S3Error({}): {}", self.code, self.message)
    }
}

impl std::error::Error for S3Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl S3Error {
    /// Create a new S3Error from an error code with its default message.
    #[must_use]
    pub fn new(code: S3ErrorCode) -> Self {
        Self::with_message(code, code.default_message())
    }

    /// Create a new S3Error with a custom message.
    #[must_use]
    pub fn with_message(code: S3ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create an `Access Denied` error with the given message.
    #[must_use]
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::with_message(S3ErrorCode::AccessDenied, message)
    }

    /// The error returned when a signature or upload policy does not verify.
    #[must_use]
    pub fn authorization_failed() -> Self {
        Self::access_denied("Authorization failed")
    }

    /// The error returned when a bucket-scoped route has no bucket segment.
    #[must_use]
    pub fn bucket_name_required() -> Self {
        Self::access_denied("Bucket name required")
    }

    /// The error returned when an object-scoped route has an empty key segment.
    #[must_use]
    pub fn key_name_required() -> Self {
        Self::access_denied("Key name required")
    }

    /// Create a `NoSuchKey` error.
    #[must_use]
    pub fn no_such_key() -> Self {
        Self::new(S3ErrorCode::NoSuchKey)
    }

    /// Create a generic `Error` (HTTP 500).
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(S3ErrorCode::InternalError, message)
    }

    /// Create a `MethodNotAllowed` error naming the rejected method.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method) -> Self {
        Self::with_message(
            S3ErrorCode::MethodNotAllowed,
            format!("The specified method is not allowed against this resource: {method}"),
        )
    }
}
