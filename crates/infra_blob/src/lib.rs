//! Filesystem Blob Store
//!
//! `BlobStore` implementation that writes each object to
//! `<root>/<bucket>/<key>`. Writes go to a temporary file in the target
//! directory first and are renamed into place, so readers never observe a
//! partially written report.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_blob::FsBlobStore;
//!
//! let blobs = Arc::new(FsBlobStore::new("/var/lib/ledger/blobs"));
//! let dispatcher = ReportDispatcher::new(blobs, DispatchConfig::new("finance-tracker-reports"));
//! ```

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{DomainPort, PortError};
use domain_ledger::BlobStore;

/// Blob store rooted at a local directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `bucket`/`key` to a path below the root
    ///
    /// # Errors
    ///
    /// `PortError::Validation` if either part is empty, absolute, or would
    /// escape the root. The bucket must be a single path segment; the key may
    /// contain `/`.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, PortError> {
        let bucket_parts = normal_segments(bucket, "bucket")?;
        if bucket_parts.len() != 1 {
            return Err(PortError::Validation {
                message: format!("bucket must be a single path segment: '{}'", bucket),
                field: Some("bucket".to_string()),
            });
        }
        let key_parts = normal_segments(key, "key")?;

        let mut path = self.root.clone();
        path.extend(bucket_parts);
        path.extend(key_parts);
        Ok(path)
    }
}

fn normal_segments<'a>(value: &'a str, field: &str) -> Result<Vec<&'a std::ffi::OsStr>, PortError> {
    let invalid = || PortError::Validation {
        message: format!("invalid {}: '{}'", field, value),
        field: Some(field.to_string()),
    };

    if value.trim().is_empty() || value.contains('\\') {
        return Err(invalid());
    }

    Path::new(value)
        .components()
        .map(|component| match component {
            Component::Normal(segment) => Ok(segment),
            _ => Err(invalid()),
        })
        .collect()
}

impl DomainPort for FsBlobStore {}

#[async_trait]
impl BlobStore for FsBlobStore {
    #[instrument(skip(self, body), fields(bytes = body.len()))]
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), PortError> {
        let path = self.object_path(bucket, key)?;
        let target = path.clone();

        // The blocking job is not cancelled with this future, so a started
        // write always ends with the object in place or its temp file gone
        tokio::task::spawn_blocking(move || write_atomically(&path, &body))
            .await
            .map_err(|e| PortError::internal_with_source("blob write task failed", e))??;

        debug!(path = %target.display(), "object written");
        Ok(())
    }
}

fn write_atomically(path: &Path, body: &[u8]) -> Result<(), PortError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            PortError::internal_with_source(
                format!("failed to create directory {}", parent.display()),
                e,
            )
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(format!(".{}.tmp", Uuid::new_v4().simple()));
    let temp = TempFile::new(PathBuf::from(temp_name));

    write_synced(temp.path(), body).map_err(|e| {
        PortError::internal_with_source(format!("failed to write {}", temp.path().display()), e)
    })?;

    std::fs::rename(temp.path(), path).map_err(|e| {
        PortError::internal_with_source(format!("failed to move object into {}", path.display()), e)
    })?;

    temp.persisted();
    Ok(())
}

fn write_synced(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(body)?;
    file.sync_all()
}

/// Temporary object file, removed on drop unless renamed into place
struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn persisted(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_writes_under_bucket() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        store
            .put("reports", "report-2025-11.txt", b"hello".to_vec(), "text/plain")
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("reports").join("report-2025-11.txt")).unwrap();
        assert_eq!(written, b"hello");
    }

    #[tokio::test]
    async fn test_put_replaces_and_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        store.put("reports", "k.txt", b"first".to_vec(), "text/plain").await.unwrap();
        store.put("reports", "k.txt", b"second".to_vec(), "text/plain").await.unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path().join("reports"))
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("k.txt")]);
        assert_eq!(std::fs::read(dir.path().join("reports/k.txt")).unwrap(), b"second");
    }

    fn entries(dir: &Path) -> Vec<std::ffi::OsString> {
        let mut names: Vec<_> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_failed_rename_removes_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());
        // A non-empty directory at the target path makes the rename fail
        std::fs::create_dir_all(dir.path().join("reports/k.txt/inner")).unwrap();

        let err = store
            .put("reports", "k.txt", b"body".to_vec(), "text/plain")
            .await
            .unwrap_err();

        assert!(matches!(err, PortError::Internal { .. }));
        assert_eq!(entries(&dir.path().join("reports")), vec![std::ffi::OsString::from("k.txt")]);
    }

    #[tokio::test]
    async fn test_abandoned_put_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());
        let body = vec![b'x'; 4 * 1024 * 1024];

        // The caller gives up right after the first poll
        let _ = tokio::time::timeout(
            std::time::Duration::ZERO,
            store.put("reports", "k.txt", body, "text/plain"),
        )
        .await;

        let target = dir.path().join("reports/k.txt");
        for _ in 0..500 {
            if target.exists() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }

        assert_eq!(entries(&dir.path().join("reports")), vec![std::ffi::OsString::from("k.txt")]);
        assert_eq!(std::fs::metadata(&target).unwrap().len(), 4 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_nested_keys_create_directories() {
        let dir = TempDir::new().unwrap();
        let store = FsBlobStore::new(dir.path());

        store
            .put("reports", "2025/11/report.txt", b"x".to_vec(), "text/plain")
            .await
            .unwrap();

        assert!(dir.path().join("reports/2025/11/report.txt").exists());
    }

    #[test]
    fn test_rejects_paths_that_escape_root() {
        let store = FsBlobStore::new("/tmp/blobs");

        for (bucket, key) in [
            ("reports", "../escape.txt"),
            ("reports", "/etc/passwd"),
            ("reports", ""),
            ("..", "k.txt"),
            ("a/b", "k.txt"),
            ("", "k.txt"),
            ("reports", "a\\b.txt"),
        ] {
            let err = store.object_path(bucket, key).unwrap_err();
            assert!(
                matches!(err, PortError::Validation { .. }),
                "expected validation error for {}/{}",
                bucket,
                key
            );
        }
    }

    #[test]
    fn test_object_path_layout() {
        let store = FsBlobStore::new("/data");
        assert_eq!(
            store.object_path("reports", "report-2025-11.txt").unwrap(),
            PathBuf::from("/data/reports/report-2025-11.txt")
        );
    }
}
