// src/lib.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
// Crate root — public re-exports used by the CLI and the integration tests.

pub mod constants;
pub mod dispatch;
pub mod provision;
pub mod report;
pub mod s3_client;
pub mod s3_ops;
pub mod size_parser;

pub use constants::{DEFAULT_BUCKET_COUNT, DEFAULT_WORKERS};
pub use dispatch::{cleanup_buckets, plan_uploads, run_tasks, run_uploads, UploadPlan, UploadTask};
pub use provision::{bucket_names, provision_buckets, provision_buckets_with};
pub use report::{OpError, Summary};
pub use size_parser::parse_size;
