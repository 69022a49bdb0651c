//! Request authentication for S3Mock.
//!
//! Two independent schemes are supported:
//!
//! - [`signer`] - AWS Signature Version 2 header signing. Every request other than
//!   `POST` form uploads and `OPTIONS` preflights carries an
//!   `Authorization: AWS <AccessKeyId>:<Signature>` header which is recomputed on
//!   the server and compared byte-for-byte.
//! - [`policy`] - browser form uploads carry a base64 policy document and its
//!   signature as form fields instead of a signed header.
//!
//! Both schemes use `Base64(HMAC-SHA1(SecretKey, input))` with a single static
//! key pair, see [`Credentials`].
//!
//! # Usage
//!
//! ```rust
//! use s3mock_auth::{Credentials, Signer};
//!
//! let credentials = Credentials::new("key", "secret");
//! let (parts, ()) = http::Request::builder()
//!     .method("GET")
//!     .uri("/mybucket/photo.jpg")
//!     .body(())
//!     .unwrap()
//!     .into_parts();
//!
//! let header = Signer::new(&parts).authorization(&credentials);
//! assert!(header.starts_with("AWS key:"));
//! ```

pub mod credentials;
pub mod error;
pub mod policy;
pub mod signer;

pub use credentials::Credentials;
pub use error::AuthError;
pub use policy::{PolicyAuthorizer, SignedPolicy, WritePolicy};
pub use signer::{Signer, sign, verify_authorization};
