//! The S3 provider: backend, readiness barrier and upload policy in one place.
//!
//! Operations are implemented as `handle_*` methods in the [`crate::ops`]
//! submodules. Every operation waits on the [`ReadyGate`] before its first
//! backend call.

use std::sync::Arc;

use s3mock_auth::PolicyAuthorizer;

use crate::ready::ReadyGate;
use crate::storage::StorageBackend;

/// Shared state of the operation layer.
///
/// Fields are `Arc`-wrapped so clones can be handed to every connection task.
#[derive(Debug)]
pub struct S3Provider<B> {
    pub(crate) backend: Arc<B>,
    pub(crate) ready: ReadyGate,
    pub(crate) policy: Arc<PolicyAuthorizer>,
}

impl<B> Clone for S3Provider<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            ready: self.ready.clone(),
            policy: Arc::clone(&self.policy),
        }
    }
}

impl<B: StorageBackend> S3Provider<B> {
    /// Create a provider.
    #[must_use]
    pub fn new(backend: Arc<B>, ready: ReadyGate, policy: PolicyAuthorizer) -> Self {
        Self {
            backend,
            ready,
            policy: Arc::new(policy),
        }
    }

    /// The storage backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The readiness barrier.
    #[must_use]
    pub fn ready_gate(&self) -> &ReadyGate {
        &self.ready
    }

    /// The form upload policy authorizer.
    #[must_use]
    pub fn policy(&self) -> &PolicyAuthorizer {
        &self.policy
    }
}

#[cfg(test)]
mod tests {
    use s3mock_auth::Credentials;

    use super::*;
    use crate::memory::InMemoryStorage;

    #[test]
    fn test_should_share_backend_between_clones() {
        let provider = S3Provider::new(
            Arc::new(InMemoryStorage::new()),
            ReadyGate::ready(),
            PolicyAuthorizer::new(Credentials::new("key", "secret"), 60, 10),
        );
        let clone = provider.clone();
        assert!(std::ptr::eq(provider.backend(), clone.backend()));
        assert!(clone.ready_gate().is_ready());
        assert_eq!(clone.policy().max_size_bytes(), 10_000_000);
    }
}
