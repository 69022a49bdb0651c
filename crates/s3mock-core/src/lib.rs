//! S3 operation layer for S3Mock.
//!
//! This crate sits between the HTTP layer (`s3mock-http`) and storage. It owns:
//!
//! - [`config`] - process configuration loaded from the environment
//! - [`storage`] - the async [`StorageBackend`] / [`BucketHandle`] contract
//! - [`memory`] - the bundled in-memory backend
//! - [`ready`] - the one-shot barrier that holds back backend calls until the
//!   backend has initialized
//! - [`form`] - the field/file visitor fed by the multipart parser
//! - [`provider`] and [`ops`] - the operation handlers and the mapping from
//!   backend errors to wire errors

pub mod config;
pub mod error;
pub mod form;
pub mod memory;
pub mod ops;
pub mod provider;
pub mod ready;
pub mod storage;

pub use config::S3MockConfig;
pub use error::StorageError;
pub use form::{FilePart, FormUpload, FormVisitor};
pub use memory::InMemoryStorage;
pub use provider::S3Provider;
pub use ready::{ReadyGate, ReadyNotifier, ready_pair};
pub use storage::{BucketHandle, BucketId, ObjectContent, StorageBackend, StoredObject};
