// src/report.rs
//
//! Typed per-operation outcomes and the end-of-run summary.
//!
//! Every S3 failure in a run is converted into an [`OpError`] and collected
//! rather than propagated: the tool's job is to generate load, so one failed
//! operation never stops the rest. The [`Summary`] lets the caller inspect
//! what actually happened instead of grepping printed strings.

use std::fmt;
use thiserror::Error;

/// A single failed S3 operation, tagged with what was being attempted.
#[derive(Debug, Error)]
pub enum OpError {
    #[error("[{bucket}] existence check failed: {message}")]
    ExistsCheckFailed { bucket: String, message: String },

    #[error("[{bucket}] failed to create bucket: {message}")]
    CreateFailed { bucket: String, message: String },

    #[error("[{bucket}] failed to upload {key}: {message}")]
    UploadFailed {
        bucket: String,
        key: String,
        message: String,
    },

    #[error("[{bucket}] cleanup failed: {message}")]
    CleanupFailed { bucket: String, message: String },
}

/// Aggregated results of a whole run.
///
/// Failures are counted and retained, never turned into a non-zero exit:
/// best-effort continuation is the point of a stress tool.
#[derive(Debug, Default)]
pub struct Summary {
    pub buckets_created: usize,
    pub buckets_existing: usize,
    pub uploads_ok: usize,
    pub uploads_failed: usize,
    pub bytes_uploaded: u64,
    pub buckets_purged: usize,
    pub objects_removed: usize,
    pub failures: Vec<OpError>,
}

impl Summary {
    pub fn record_failure(&mut self, err: OpError) {
        match &err {
            OpError::UploadFailed { .. } => self.uploads_failed += 1,
            _ => {}
        }
        self.failures.push(err);
    }

    /// True when every attempted operation succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Buckets: {} created, {} already existed",
            self.buckets_created, self.buckets_existing
        )?;
        writeln!(
            f,
            "Uploads: {} ok, {} failed ({} bytes uploaded)",
            self.uploads_ok, self.uploads_failed, self.bytes_uploaded
        )?;
        if self.buckets_purged > 0 || self.objects_removed > 0 {
            writeln!(
                f,
                "Cleanup: {} bucket(s) purged, {} object(s) removed",
                self.buckets_purged, self.objects_removed
            )?;
        }
        write!(f, "Total failures: {}", self.failures.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_failure_counts_uploads() {
        let mut summary = Summary::default();
        summary.record_failure(OpError::UploadFailed {
            bucket: "b0".into(),
            key: "k_0".into(),
            message: "timeout".into(),
        });
        summary.record_failure(OpError::CreateFailed {
            bucket: "b1".into(),
            message: "denied".into(),
        });
        assert_eq!(summary.uploads_failed, 1);
        assert_eq!(summary.failures.len(), 2);
        assert!(!summary.is_clean());
    }

    #[test]
    fn test_display_mentions_counts() {
        let summary = Summary {
            buckets_created: 2,
            buckets_existing: 1,
            uploads_ok: 5,
            ..Default::default()
        };
        let text = summary.to_string();
        assert!(text.contains("2 created"));
        assert!(text.contains("5 ok"));
        assert!(summary.is_clean());
    }
}
