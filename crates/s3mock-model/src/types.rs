//! Value types shared between the backend and the XML formatter.

use serde::{Deserialize, Serialize};

/// One entry of a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    /// The bucket name.
    pub name: String,
}

impl BucketSummary {
    /// Create a summary for the named bucket.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
