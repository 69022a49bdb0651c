//! Error types for request authentication.

/// Errors produced while verifying a signed request or an upload policy.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The `Authorization` header is missing from the request.
    #[error("Missing Authorization header")]
    MissingAuthHeader,

    /// The `Authorization` header is not valid visible ASCII.
    #[error("Invalid Authorization header format")]
    InvalidAuthHeader,

    /// The computed authorization does not match the provided one.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,

    /// A form field required for policy authorization is absent.
    #[error("Missing form field: {0}")]
    MissingFormField(&'static str),

    /// The `AWSAccessKeyId` form field names an unknown access key.
    #[error("Access key not found: {0}")]
    AccessKeyNotFound(String),

    /// The policy document could not be decoded.
    #[error("Invalid policy document: {0}")]
    InvalidPolicy(String),

    /// The policy expiration is in the past or beyond the allowed validity window.
    #[error("Policy has expired or exceeds the allowed validity")]
    PolicyExpired,

    /// The submitted policy does not match the policy rebuilt for this upload.
    #[error("Policy does not match")]
    PolicyMismatch,
}
