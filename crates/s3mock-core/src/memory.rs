//! In-memory storage backend.
//!
//! Buckets live in a [`DashMap`] keyed by name; each bucket holds its own
//! object map. Bucket creation goes through the map's entry API so concurrent
//! creations of one name cannot both succeed. Content hashes are MD5 hex
//! digests and MIME types are guessed from the key's extension.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use md5::{Digest, Md5};
use s3mock_model::BucketSummary;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::storage::{BucketHandle, BucketId, ObjectContent, StorageBackend, StoredObject};

/// Thread-safe in-memory storage.
#[derive(Debug)]
pub struct InMemoryStorage {
    buckets: DashMap<String, Arc<MemoryBucket>>,
    next_id: AtomicU64,
}

#[derive(Debug)]
struct MemoryBucket {
    id: BucketId,
    name: String,
    objects: DashMap<String, MemoryObject>,
}

#[derive(Debug, Clone)]
struct MemoryObject {
    data: Bytes,
    md5_hex: String,
    mime_type: String,
}

/// Handle to one in-memory bucket.
#[derive(Debug, Clone)]
pub struct MemoryBucketHandle {
    bucket: Arc<MemoryBucket>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create an empty store. Bucket IDs start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buckets: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorage {
    type Bucket = MemoryBucketHandle;

    async fn initialize(&self) -> Result<(), StorageError> {
        info!("in-memory storage initialized");
        Ok(())
    }

    async fn create_bucket(&self, name: &str) -> Result<BucketId, StorageError> {
        match self.buckets.entry(name.to_owned()) {
            Entry::Occupied(_) => Err(StorageError::BucketAlreadyExists {
                bucket: name.to_owned(),
            }),
            Entry::Vacant(slot) => {
                let id = BucketId(self.next_id.fetch_add(1, Ordering::Relaxed));
                slot.insert(Arc::new(MemoryBucket {
                    id,
                    name: name.to_owned(),
                    objects: DashMap::new(),
                }));
                info!(bucket = %name, id = %id, "bucket created");
                Ok(id)
            }
        }
    }

    async fn delete_bucket(&self, name: &str) -> Result<(), StorageError> {
        if self
            .buckets
            .remove_if(name, |_, bucket| bucket.objects.is_empty())
            .is_some()
        {
            info!(bucket = %name, "bucket deleted");
            return Ok(());
        }

        if self.buckets.contains_key(name) {
            Err(StorageError::BucketNotEmpty {
                bucket: name.to_owned(),
            })
        } else {
            Err(StorageError::NoSuchBucket {
                bucket: name.to_owned(),
            })
        }
    }

    async fn list_buckets(&self) -> Result<Vec<BucketSummary>, StorageError> {
        let mut buckets: Vec<(BucketId, String)> = self
            .buckets
            .iter()
            .map(|entry| (entry.id, entry.name.clone()))
            .collect();
        buckets.sort_unstable_by_key(|(id, _)| *id);
        Ok(buckets
            .into_iter()
            .map(|(_, name)| BucketSummary::new(name))
            .collect())
    }

    async fn get_bucket(&self, name: &str) -> Result<MemoryBucketHandle, StorageError> {
        self.buckets
            .get(name)
            .map(|entry| MemoryBucketHandle {
                bucket: Arc::clone(entry.value()),
            })
            .ok_or_else(|| StorageError::NoSuchBucket {
                bucket: name.to_owned(),
            })
    }
}

#[async_trait]
impl BucketHandle for MemoryBucketHandle {
    fn name(&self) -> &str {
        &self.bucket.name
    }

    async fn insert_file(&self, key: &str, body: Bytes) -> Result<StoredObject, StorageError> {
        let md5_hex = hex::encode(Md5::digest(&body));
        let mime_type = mime_guess::from_path(key)
            .first_or_octet_stream()
            .essence_str()
            .to_owned();
        let size = body.len() as u64;

        self.bucket.objects.insert(
            key.to_owned(),
            MemoryObject {
                data: body,
                md5_hex: md5_hex.clone(),
                mime_type,
            },
        );

        debug!(bucket = %self.bucket.name, key = %key, size, "object stored");
        Ok(StoredObject {
            content_hash: md5_hex,
            size,
        })
    }

    async fn get_file(&self, key: &str) -> Result<ObjectContent, StorageError> {
        let object = self.lookup(key)?;
        Ok(ObjectContent {
            body: object.data,
            mime_type: object.mime_type,
        })
    }

    async fn delete_file(&self, key: &str) -> Result<(), StorageError> {
        if self.bucket.objects.remove(key).is_none() {
            return Err(StorageError::NoSuchKey {
                key: key.to_owned(),
            });
        }
        debug!(bucket = %self.bucket.name, key = %key, "object deleted");
        Ok(())
    }

    async fn get_content_hash(&self, key: &str) -> Result<String, StorageError> {
        self.lookup(key).map(|object| object.md5_hex)
    }
}

impl MemoryBucketHandle {
    fn lookup(&self, key: &str) -> Result<MemoryObject, StorageError> {
        self.bucket
            .objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::NoSuchKey {
                key: key.to_owned(),
            })
    }
}
