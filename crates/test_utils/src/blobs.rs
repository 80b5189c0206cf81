//! Scripted blob store
//!
//! Wraps `InMemoryBlobStore` with configurable latency and failure so
//! dispatch behavior can be tested under paused tokio time.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};
use domain_ledger::{BlobStore, InMemoryBlobStore};

/// Blob store that sleeps before each upload and can be told to fail
#[derive(Debug, Clone, Default)]
pub struct ScriptedBlobStore {
    inner: InMemoryBlobStore,
    delay: Duration,
    fail: bool,
    attempts: Arc<AtomicU64>,
}

impl ScriptedBlobStore {
    /// Succeeds immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleeps `delay` before each upload
    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    /// Every upload fails with a connection error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// The objects successfully written so far
    pub fn objects(&self) -> &InMemoryBlobStore {
        &self.inner
    }

    /// Number of `put` calls started
    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl DomainPort for ScriptedBlobStore {}

#[async_trait]
impl BlobStore for ScriptedBlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PortError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(PortError::connection("scripted upload failure"));
        }
        self.inner.put(bucket, key, body, content_type).await
    }
}
