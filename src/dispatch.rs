// src/dispatch.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Capacity-target upload dispatch.
//!
//! Planning figures out how many copies of the source file it takes to reach
//! the target aggregate size and assigns each copy a bucket round-robin.
//! Execution runs the uploads through a semaphore-bounded set of tokio tasks,
//! reporting each result as it completes. There is no retry, no per-task
//! timeout and no cancellation: every submitted upload runs to completion or
//! to its first error, and siblings are never affected.

use anyhow::{bail, Context, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::report::{OpError, Summary};
use crate::s3_ops;
use crate::size_parser::parse_size;

/// One pending upload: copy number `index` of the source file goes to
/// `bucket` under `key`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTask {
    pub index: u64,
    pub bucket: String,
    pub key: String,
}

/// The full batch of uploads for one run, fixed before anything is sent.
#[derive(Debug)]
pub struct UploadPlan {
    pub file_path: PathBuf,
    pub file_size: u64,
    pub target_size: u64,
    pub tasks: Vec<UploadTask>,
}

/// Work out the upload batch for `capacity_target` worth of copies of
/// `file_path`, spread round-robin over `buckets`.
///
/// Returns `Ok(None)` for a zero-byte source file: nothing is ever uploaded
/// and no S3 call is made. A target smaller than the file clamps to exactly
/// one upload. Bucket assignment is `index % buckets.len()`, decided here,
/// so it is deterministic regardless of completion order later.
pub fn plan_uploads(
    buckets: &[String],
    file_path: &Path,
    capacity_target: &str,
) -> Result<Option<UploadPlan>> {
    if buckets.is_empty() {
        bail!("no target buckets to upload into");
    }

    let target_size = parse_size(capacity_target)?;
    let file_size = std::fs::metadata(file_path)
        .with_context(|| format!("cannot stat source file '{}'", file_path.display()))?
        .len();

    if file_size == 0 {
        warn!("File size is zero! Cannot upload.");
        return Ok(None);
    }

    let mut upload_count = target_size / file_size;
    if upload_count == 0 {
        info!("Target capacity is smaller than file size. Uploading once.");
        upload_count = 1;
    }

    let file_name = file_path
        .file_name()
        .with_context(|| format!("'{}' has no file name component", file_path.display()))?
        .to_string_lossy()
        .into_owned();

    let tasks = (0..upload_count)
        .map(|i| UploadTask {
            index: i,
            bucket: buckets[(i % buckets.len() as u64) as usize].clone(),
            key: format!("{}_{}", file_name, i),
        })
        .collect();

    info!("File size: {} bytes", file_size);
    info!("Target capacity: {} bytes", target_size);
    info!("Total uploads required: {}", upload_count);

    Ok(Some(UploadPlan {
        file_path: file_path.to_path_buf(),
        file_size,
        target_size,
        tasks,
    }))
}

/// Run `tasks` through `op` with at most `workers` in flight at once.
///
/// Results come back in completion order, not submission order. The batch
/// always drains fully; a failed task surfaces as an `Err` entry in the
/// returned pairs, never as an early abort.
pub async fn run_tasks<F, Fut>(
    tasks: Vec<UploadTask>,
    workers: usize,
    op: F,
) -> Result<Vec<(UploadTask, Result<u64>)>>
where
    F: Fn(UploadTask) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<u64>> + Send + 'static,
{
    let op = Arc::new(op);
    let sem = Arc::new(Semaphore::new(workers));
    let mut futs = FuturesUnordered::new();

    for task in tasks {
        let sem = sem.clone();
        let op = op.clone();
        futs.push(tokio::spawn(async move {
            let _permit = sem.acquire_owned().await.unwrap();
            let res = op(task.clone()).await;
            (task, res)
        }));
    }

    let mut out = Vec::with_capacity(futs.len());
    while let Some(res) = futs.next().await {
        out.push(res?);
    }
    Ok(out)
}

/// Execute the plan against S3 and fold the outcomes into `summary`.
pub async fn run_uploads(plan: &UploadPlan, workers: usize, summary: &mut Summary) -> Result<()> {
    info!(
        "Distributing {} upload(s) with {} parallel worker(s)...",
        plan.tasks.len(),
        workers
    );

    let file_path = plan.file_path.clone();
    let results = run_tasks(plan.tasks.clone(), workers, move |task| {
        let file_path = file_path.clone();
        async move {
            match s3_ops::put_file(&task.bucket, &task.key, &file_path).await {
                Ok(bytes) => {
                    info!("[{}] Uploaded object {}", task.bucket, task.key);
                    Ok(bytes)
                }
                Err(e) => {
                    warn!("[{}] Failed to upload {}: {}", task.bucket, task.key, e);
                    Err(e)
                }
            }
        }
    })
    .await?;

    for (task, res) in results {
        match res {
            Ok(bytes) => {
                summary.uploads_ok += 1;
                summary.bytes_uploaded += bytes;
            }
            Err(e) => {
                summary.record_failure(OpError::UploadFailed {
                    bucket: task.bucket,
                    key: task.key,
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(())
}

/// Purge every bucket in the original list, one at a time. Runs after the
/// upload pool has fully drained, regardless of how many uploads failed.
pub async fn cleanup_buckets(buckets: &[String], summary: &mut Summary) {
    for bucket in buckets {
        info!("Cleaning up bucket {}...", bucket);
        match s3_ops::purge_bucket(bucket).await {
            Ok(removed) => {
                info!("Bucket {} cleaned up successfully ({} objects)", bucket, removed);
                summary.buckets_purged += 1;
                summary.objects_removed += removed;
            }
            Err(e) => {
                warn!("Failed to cleanup bucket {}: {}", bucket, e);
                summary.record_failure(OpError::CleanupFailed {
                    bucket: bucket.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_of_size(bytes: usize) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(&vec![0u8; bytes]).unwrap();
        f.flush().unwrap();
        f
    }

    fn buckets(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("bucket-{}", i)).collect()
    }

    #[test]
    fn test_upload_count_is_target_over_file_size() {
        let f = file_of_size(100);
        let plan = plan_uploads(&buckets(1), f.path(), "250").unwrap().unwrap();
        assert_eq!(plan.tasks.len(), 2);
        assert_eq!(plan.file_size, 100);
        assert_eq!(plan.target_size, 250);
    }

    #[test]
    fn test_upload_count_clamps_to_one() {
        let f = file_of_size(300);
        let plan = plan_uploads(&buckets(2), f.path(), "100").unwrap().unwrap();
        assert_eq!(plan.tasks.len(), 1);
    }

    #[test]
    fn test_zero_byte_file_yields_no_plan() {
        let f = file_of_size(0);
        let plan = plan_uploads(&buckets(3), f.path(), "1GB").unwrap();
        assert!(plan.is_none());
    }

    #[test]
    fn test_round_robin_assignment() {
        let f = file_of_size(10);
        let b = buckets(3);
        let plan = plan_uploads(&b, f.path(), "70").unwrap().unwrap();
        assert_eq!(plan.tasks.len(), 7);
        for task in &plan.tasks {
            assert_eq!(task.bucket, b[(task.index % 3) as usize]);
        }
    }

    #[test]
    fn test_object_names_use_index_suffix() {
        let f = file_of_size(10);
        let plan = plan_uploads(&buckets(1), f.path(), "30").unwrap().unwrap();
        let file_name = f.path().file_name().unwrap().to_string_lossy().into_owned();
        let keys: Vec<_> = plan.tasks.iter().map(|t| t.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                format!("{}_0", file_name),
                format!("{}_1", file_name),
                format!("{}_2", file_name),
            ]
        );
    }

    #[test]
    fn test_size_suffix_accepted_in_target() {
        let f = file_of_size(512);
        let plan = plan_uploads(&buckets(1), f.path(), "1KB").unwrap().unwrap();
        assert_eq!(plan.tasks.len(), 2);
    }

    #[test]
    fn test_empty_bucket_list_is_an_error() {
        let f = file_of_size(10);
        assert!(plan_uploads(&[], f.path(), "100").is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(plan_uploads(&buckets(1), Path::new("/nonexistent/file"), "100").is_err());
    }

    #[test]
    fn test_bad_target_size_is_an_error() {
        let f = file_of_size(10);
        assert!(plan_uploads(&buckets(1), f.path(), "banana").is_err());
    }
}
