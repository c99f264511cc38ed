// src/constants.rs
//
// Centralized constants for s3-stress to avoid hardcoded values throughout the codebase

/// Fallback region when neither AWS_REGION nor the default provider resolves one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default number of concurrent upload workers
pub const DEFAULT_WORKERS: usize = 10;

/// Default number of buckets to provision
pub const DEFAULT_BUCKET_COUNT: usize = 5;

/// Maximum keys per DeleteObjects request (S3 API limit)
pub const DELETE_BATCH_SIZE: usize = 1_000;
