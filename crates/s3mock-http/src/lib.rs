//! S3 HTTP service layer for S3Mock.
//!
//! This crate turns hyper requests into calls on the operation layer
//! (`s3mock-core`) and turns the results back into S3-shaped responses.
//!
//! # Request lifecycle
//!
//! 1. Health probes (`GET /_health`, `GET /health`) and CORS preflights
//!    (`OPTIONS`) are answered directly.
//! 2. The [`router`] resolves the bucket/key pair with [`resource::parse_resource`]
//!    and identifies the operation from the method and path shape.
//! 3. Every request except `POST` form uploads is authenticated with the
//!    SigV2 signer from `s3mock-auth`.
//! 4. The body is collected and the operation is dispatched through
//!    [`dispatch::S3Handler`]. Form uploads are parsed by [`form`] first.
//! 5. Outputs are serialized by [`response::IntoS3Response`]; errors become XML
//!    error documents.
//!
//! # Modules
//!
//! - [`body`] - response body type
//! - [`dispatch`] - handler trait and its implementation for the provider
//! - [`form`] - `multipart/form-data` parsing into a form visitor
//! - [`resource`] - bucket/key extraction from the request target
//! - [`response`] - output and error serialization
//! - [`router`] - operation identification
//! - [`service`] - the hyper `Service`

pub mod body;
pub mod dispatch;
pub mod form;
pub mod resource;
pub mod response;
pub mod router;
pub mod service;

pub use service::{S3HttpConfig, S3HttpService};
