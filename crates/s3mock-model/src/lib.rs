//! Shared S3 wire model for S3Mock.
//!
//! Types in this crate are plain values passed between the HTTP layer
//! (`s3mock-http`), the operation layer (`s3mock-core`), and the XML formatter
//! (`s3mock-xml`). Nothing here performs I/O.

pub mod error;
pub mod operations;
pub mod output;
pub mod resource;
pub mod types;

pub use error::{S3Error, S3ErrorCode};
pub use operations::S3Operation;
pub use resource::ParsedResource;
pub use types::BucketSummary;
