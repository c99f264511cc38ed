// src/provision.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Sequential bucket provisioning: derive `{prefix}{i}` names, check each for
//! existence, create the missing ones.

use anyhow::{bail, Result};
use tracing::{info, warn};

use crate::report::{OpError, Summary};
use crate::s3_ops;

/// Provision `count` buckets named `{prefix}0` .. `{prefix}{count-1}`,
/// one at a time.
///
/// By default this is best-effort and mirrors the original tool: a bucket
/// whose creation failed is STILL included in the returned list, so the
/// caller cannot tell a provisioned bucket from a broken one by the list
/// alone. The failure is recorded in `summary.failures` instead. Pass
/// `fail_fast = true` to abort on the first creation failure instead.
///
/// Idempotent against the external store: buckets that already exist are
/// detected and skipped, no duplicate creation is attempted.
pub async fn provision_buckets(
    prefix: &str,
    count: usize,
    fail_fast: bool,
    summary: &mut Summary,
) -> Result<Vec<String>> {
    provision_buckets_with(
        prefix,
        count,
        fail_fast,
        summary,
        |bucket| async move { s3_ops::bucket_exists(&bucket).await },
        |bucket| async move { s3_ops::create_bucket(&bucket).await },
    )
    .await
}

/// Provisioning loop over caller-supplied existence/creation operations.
/// [`provision_buckets`] wires in the real S3 calls.
pub async fn provision_buckets_with<E, EF, C, CF>(
    prefix: &str,
    count: usize,
    fail_fast: bool,
    summary: &mut Summary,
    exists: E,
    create: C,
) -> Result<Vec<String>>
where
    E: Fn(String) -> EF,
    EF: Future<Output = Result<bool>>,
    C: Fn(String) -> CF,
    CF: Future<Output = Result<()>>,
{
    let mut bucket_list = Vec::with_capacity(count);

    for bucket in bucket_names(prefix, count) {
        // Any failure of the existence check is treated as "absent" and we
        // fall through to creation, which tolerates already-exists answers.
        let found = match exists(bucket.clone()).await {
            Ok(found) => found,
            Err(e) => {
                warn!("existence check for '{}' failed, assuming absent: {}", bucket, e);
                summary.record_failure(OpError::ExistsCheckFailed {
                    bucket: bucket.clone(),
                    message: e.to_string(),
                });
                false
            }
        };

        if found {
            info!("Bucket {} already exists", bucket);
            summary.buckets_existing += 1;
        } else {
            match create(bucket.clone()).await {
                Ok(()) => {
                    info!("Bucket {} created successfully", bucket);
                    summary.buckets_created += 1;
                }
                Err(e) => {
                    if fail_fast {
                        bail!("failed to create bucket '{}': {}", bucket, e);
                    }
                    warn!("Failed to create bucket {}: {}", bucket, e);
                    summary.record_failure(OpError::CreateFailed {
                        bucket: bucket.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        bucket_list.push(bucket);
    }

    Ok(bucket_list)
}

/// Name derivation shared with tests: `{prefix}{i}` for i in 0..count.
pub fn bucket_names(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{}{}", prefix, i)).collect()
}
