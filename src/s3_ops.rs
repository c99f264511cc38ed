// src/s3_ops.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! The four S3 operations the stress tool performs: existence check, bucket
//! creation, file upload, and recursive purge. All of them go through the
//! global client from [`crate::s3_client`].

use anyhow::{Context, Result};
use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tracing::debug;

use crate::constants::DELETE_BATCH_SIZE;
use crate::s3_client::s3_client;

/// Check whether `bucket` exists and is reachable with the current
/// credentials. A definitive NotFound answers `Ok(false)`; any other service
/// error is propagated so the caller can decide how to treat it.
pub async fn bucket_exists(bucket: &str) -> Result<bool> {
    let client = s3_client().await?;
    match client.head_bucket().bucket(bucket).send().await {
        Ok(_) => Ok(true),
        Err(e) => {
            let not_found = e
                .as_service_error()
                .map(|se| se.is_not_found())
                .unwrap_or(false);
            if not_found {
                Ok(false)
            } else {
                Err(anyhow::Error::from(e))
                    .with_context(|| format!("head_bucket failed for '{}'", bucket))
            }
        }
    }
}

/// Create an S3 bucket. If the bucket already exists, ignore the error.
pub async fn create_bucket(bucket: &str) -> Result<()> {
    let client = s3_client().await?;
    match client.create_bucket().bucket(bucket).send().await {
        Ok(_) => Ok(()),
        Err(e) => {
            if let Some(code) = e.code() {
                if code == "BucketAlreadyOwnedByYou" || code == "BucketAlreadyExists" {
                    return Ok(());
                }
            }
            Err(anyhow::Error::from(e))
                .with_context(|| format!("create_bucket failed for '{}'", bucket))
        }
    }
}

/// Upload a local file to `s3://bucket/key`, streaming it from disk.
/// Returns the number of bytes sent.
pub async fn put_file(bucket: &str, key: &str, path: &Path) -> Result<u64> {
    let client = s3_client().await?;
    let size = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("cannot stat '{}'", path.display()))?
        .len();
    let body = ByteStream::from_path(path)
        .await
        .with_context(|| format!("cannot open '{}'", path.display()))?;
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(body)
        .send()
        .await
        .with_context(|| format!("put_object failed for s3://{}/{}", bucket, key))?;
    Ok(size)
}

/// List every key in `bucket` (handles pagination).
pub async fn list_all_keys(bucket: &str) -> Result<Vec<String>> {
    let client = s3_client().await?;
    let mut keys = Vec::new();
    let mut cont: Option<String> = None;
    loop {
        let mut req = client.list_objects_v2().bucket(bucket);
        if let Some(token) = &cont {
            req = req.continuation_token(token);
        }
        let resp = req.send().await.context("list_objects_v2 failed")?;
        for obj in resp.contents() {
            if let Some(k) = obj.key() {
                keys.push(k.to_owned());
            }
        }
        if let Some(token) = resp.next_continuation_token() {
            cont = Some(token.to_string());
        } else {
            break;
        }
    }
    Ok(keys)
}

/// Remove every object in `bucket`, batching at 1 000 keys per DeleteObjects
/// call. The bucket resource itself is left in place. Returns the number of
/// objects removed.
pub async fn purge_bucket(bucket: &str) -> Result<usize> {
    use aws_sdk_s3::types::{Delete, ObjectIdentifier};

    let keys = list_all_keys(bucket).await?;
    if keys.is_empty() {
        debug!("bucket '{}' is already empty", bucket);
        return Ok(0);
    }

    let client = s3_client().await?;
    for chunk in keys.chunks(DELETE_BATCH_SIZE) {
        let objs: Vec<ObjectIdentifier> = chunk
            .iter()
            .map(|k| {
                ObjectIdentifier::builder()
                    .key(k)
                    .build()
                    .map_err(anyhow::Error::from)
            })
            .collect::<Result<_>>()?;

        let delete: Delete = Delete::builder()
            .set_objects(Some(objs))
            .build()
            .map_err(anyhow::Error::from)?;

        client
            .delete_objects()
            .bucket(bucket)
            .delete(delete)
            .send()
            .await
            .context("delete_objects failed")?;
    }
    Ok(keys.len())
}
