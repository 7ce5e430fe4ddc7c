//! # Upload Staging
//!
//! Writes validated uploads to a temporary directory so a later create/update can send
//! them. Names combine a nanosecond timestamp, a process-wide sequence number and the
//! sanitized original name, and files are opened with create-new semantics, so concurrent
//! sessions never collide and never need a lock.
//!
//! Staged files that are never committed are orphans. Removing them is the job of a
//! separate janitor; the stager does not delete anything.

use crate::error::UploadError;
use crate::upload::PendingUpload;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};

/// A file written to temporary storage, ready to be attached to a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub storage_path: PathBuf,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Persists accepted uploads under a staging directory.
#[derive(Debug)]
pub struct UploadStager {
    root: PathBuf,
    sequence: AtomicU64,
}

impl UploadStager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the upload and returns where it landed. Every call produces a new file.
    ///
    /// # Errors
    ///
    /// [`UploadError::StorageUnavailable`] when the directory cannot be created or written.
    #[instrument(skip(self, pending), fields(name = pending.original_name(), size = pending.size_bytes()))]
    pub async fn stage(&self, pending: PendingUpload) -> Result<StagedFile, UploadError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| storage_unavailable(&self.root, e))?;

        let created_at = Utc::now();
        let stamp = created_at
            .timestamp_nanos_opt()
            .unwrap_or_else(|| created_at.timestamp_micros().saturating_mul(1_000));
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let file_name = format!(
            "{stamp}-{sequence}-{}",
            sanitize_file_name(pending.original_name())
        );
        let storage_path = self.root.join(file_name);

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&storage_path)
            .await
            .map_err(|e| storage_unavailable(&storage_path, e))?;
        file.write_all(pending.data())
            .await
            .map_err(|e| storage_unavailable(&storage_path, e))?;
        file.flush()
            .await
            .map_err(|e| storage_unavailable(&storage_path, e))?;

        info!(path = %storage_path.display(), "Staged");
        Ok(StagedFile {
            storage_path,
            original_name: pending.original_name().to_string(),
            content_type: pending.declared_type().to_string(),
            size_bytes: pending.size_bytes(),
            created_at,
        })
    }
}

fn storage_unavailable(path: &Path, error: std::io::Error) -> UploadError {
    warn!(path = %path.display(), %error, "Staging failed");
    UploadError::StorageUnavailable(error.to_string())
}

/// Keeps the last path component and replaces anything outside `[A-Za-z0-9._-]`.
fn sanitize_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim_start_matches('.');
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}
