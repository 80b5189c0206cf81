//! Detached report dispatch
//!
//! Uploads run on their own tokio tasks, so finishing or cancelling the
//! request that produced a report never cancels its upload. Each upload has
//! its own timeout and is attempted exactly once. At most `max_in_flight`
//! uploads run at a time; later submissions wait inside their own task for a
//! slot, so the caller never blocks. Outcomes are only visible through logs
//! and `DispatchStats`.
//!
//! ```text
//! generate_monthly_report ──dispatch()──► spawn ──► acquire slot ──► timeout(put)
//!          │                                            │ none free      │
//!          ▼                                            ▼                ▼
//!   returns immediately                            wait (Queued)   log + count outcome
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info, info_span, warn, Instrument};

use core_kernel::PortError;

use crate::ports::BlobStore;

/// Content type of every uploaded report
pub const REPORT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Settings for report uploads
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Bucket every report is written to
    pub bucket: String,
    /// Upper bound on a single upload
    pub timeout: Duration,
    /// Maximum concurrent uploads
    pub max_in_flight: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            bucket: "finance-tracker-reports".to_string(),
            timeout: Duration::from_secs(30),
            max_in_flight: 16,
        }
    }
}

impl DispatchConfig {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            ..Default::default()
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_in_flight(mut self, max: usize) -> Self {
        self.max_in_flight = max.max(1);
        self
    }
}

/// Result of submitting an upload; says nothing about upload success
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DispatchOutcome {
    /// An upload slot was free and the upload started right away
    Scheduled,
    /// Every slot was busy; the upload starts once one frees up
    Queued,
}

/// Point-in-time copy of dispatch counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Every submitted upload, queued or not
    pub scheduled: u64,
    /// Submissions that had to wait for a slot
    pub queued: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub timed_out: u64,
}

impl DispatchStats {
    /// Uploads submitted but not yet finished
    pub fn pending(&self) -> u64 {
        self.scheduled
            .saturating_sub(self.succeeded + self.failed + self.timed_out)
    }
}

#[derive(Debug, Default)]
struct Counters {
    scheduled: AtomicU64,
    queued: AtomicU64,
    succeeded: AtomicU64,
    failed: AtomicU64,
    timed_out: AtomicU64,
}

/// Fire-and-forget uploader for rendered reports
#[derive(Clone)]
pub struct ReportDispatcher {
    blob_store: Arc<dyn BlobStore>,
    config: DispatchConfig,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for ReportDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportDispatcher")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

impl ReportDispatcher {
    pub fn new(blob_store: Arc<dyn BlobStore>, config: DispatchConfig) -> Self {
        let config = DispatchConfig {
            max_in_flight: config.max_in_flight.max(1),
            ..config
        };
        Self {
            blob_store,
            permits: Arc::new(Semaphore::new(config.max_in_flight)),
            tracker: TaskTracker::new(),
            counters: Arc::new(Counters::default()),
            config,
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// `<bucket>/<key>` as reported to callers
    pub fn location(&self, key: &str) -> String {
        format!("{}/{}", self.config.bucket, key)
    }

    /// Submits `content` for upload under `key` and returns without waiting
    ///
    /// Every submission is uploaded exactly once. When all slots are busy the
    /// background task waits for one; the timeout only covers the upload
    /// itself. Must be called from within a tokio runtime.
    pub fn dispatch(&self, key: impl Into<String>, content: String) -> DispatchOutcome {
        let key = key.into();

        let ready = Arc::clone(&self.permits).try_acquire_owned().ok();
        let outcome = match ready {
            Some(_) => DispatchOutcome::Scheduled,
            None => {
                self.counters.queued.fetch_add(1, Ordering::Relaxed);
                debug!(
                    key = %key,
                    max_in_flight = self.config.max_in_flight,
                    "all upload slots busy, report upload queued"
                );
                DispatchOutcome::Queued
            }
        };
        self.counters.scheduled.fetch_add(1, Ordering::Relaxed);

        let permits = Arc::clone(&self.permits);
        let blob_store = Arc::clone(&self.blob_store);
        let counters = Arc::clone(&self.counters);
        let bucket = self.config.bucket.clone();
        let timeout = self.config.timeout;
        let span = info_span!("report_dispatch", bucket = %bucket, key = %key);

        self.tracker.spawn(
            async move {
                let _permit = match ready {
                    Some(permit) => permit,
                    None => match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => {
                            counters.failed.fetch_add(1, Ordering::Relaxed);
                            error!(error = %e, "upload slots closed, report not uploaded");
                            return;
                        }
                    },
                };

                let started = Instant::now();
                let upload = blob_store.put(&bucket, &key, content.into_bytes(), REPORT_CONTENT_TYPE);

                match tokio::time::timeout(timeout, upload).await {
                    Ok(Ok(())) => {
                        counters.succeeded.fetch_add(1, Ordering::Relaxed);
                        info!(elapsed_ms = started.elapsed().as_millis() as u64, "report uploaded");
                    }
                    Ok(Err(e)) => {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                        error!(error = %e, "report upload failed");
                    }
                    Err(_) => {
                        counters.timed_out.fetch_add(1, Ordering::Relaxed);
                        let err = PortError::Timeout {
                            operation: format!("put {}/{}", bucket, key),
                            duration_ms: timeout.as_millis() as u64,
                        };
                        warn!(error = %err, "report upload timed out");
                    }
                }
            }
            .instrument(span),
        );

        outcome
    }

    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            scheduled: self.counters.scheduled.load(Ordering::Relaxed),
            queued: self.counters.queued.load(Ordering::Relaxed),
            succeeded: self.counters.succeeded.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            timed_out: self.counters.timed_out.load(Ordering::Relaxed),
        }
    }

    /// Number of uploads currently holding a slot
    pub fn in_flight(&self) -> usize {
        self.config.max_in_flight - self.permits.available_permits()
    }

    /// Waits until every upload submitted so far has finished
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Waits up to `grace` for submitted uploads; returns false if some were
    /// still running or queued when the grace period ended
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();
        let pending = self.tracker.len();
        if pending > 0 {
            info!(pending, grace_ms = grace.as_millis() as u64, "waiting for report uploads");
        }

        let drained = tokio::time::timeout(grace, self.tracker.wait()).await.is_ok();
        if !drained {
            warn!(abandoned = self.tracker.len(), "report uploads still running at shutdown");
        }
        drained
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryBlobStore;

    #[tokio::test]
    async fn test_successful_upload() {
        let blobs = InMemoryBlobStore::new();
        let dispatcher = ReportDispatcher::new(Arc::new(blobs.clone()), DispatchConfig::new("reports"));

        let outcome = dispatcher.dispatch("report-2025-11.txt", "body".to_string());
        dispatcher.drain().await;

        assert_eq!(outcome, DispatchOutcome::Scheduled);
        let object = blobs.get("reports", "report-2025-11.txt").await.unwrap();
        assert_eq!(object.text(), Some("body"));
        assert_eq!(object.content_type, REPORT_CONTENT_TYPE);
        assert_eq!(dispatcher.stats().succeeded, 1);
        assert_eq!(dispatcher.location("report-2025-11.txt"), "reports/report-2025-11.txt");
    }

    #[tokio::test]
    async fn test_busy_slots_queue_instead_of_dropping() {
        let blobs = InMemoryBlobStore::new();
        let config = DispatchConfig::new("reports").max_in_flight(1);
        let dispatcher = ReportDispatcher::new(Arc::new(blobs.clone()), config);

        // Nothing runs until this task yields, so the first upload still holds the slot
        assert_eq!(dispatcher.dispatch("a", "1".to_string()), DispatchOutcome::Scheduled);
        assert_eq!(dispatcher.dispatch("b", "2".to_string()), DispatchOutcome::Queued);
        assert_eq!(dispatcher.in_flight(), 1);

        dispatcher.drain().await;

        let stats = dispatcher.stats();
        assert_eq!((stats.scheduled, stats.queued, stats.succeeded), (2, 1, 2));
        assert_eq!(dispatcher.in_flight(), 0);
        assert_eq!(blobs.len().await, 2);
    }

    #[test]
    fn test_max_in_flight_is_at_least_one() {
        assert_eq!(DispatchConfig::default().max_in_flight(0).max_in_flight, 1);
    }

    #[test]
    fn test_outcome_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&DispatchOutcome::Queued).unwrap(), "\"queued\"");
    }
}
