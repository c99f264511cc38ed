//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! s3-stress — fill a set of S3 buckets with copies of one file until a
//! target aggregate size is reached.
//!
//! Examples:
//! ```bash
//! s3-stress --bucket-prefix node1-bucket- --bucket-count 5 \
//!           --file /data/payload.bin --target-size 5000GB --workers 20
//! s3-stress --bucket-prefix scratch- --file big.iso --target-size 100GB --cleanup
//! ```
//!
//! Credentials, region and endpoint come from the environment or a `.env`
//! file (AWS_ACCESS_KEY_ID, AWS_SECRET_ACCESS_KEY, AWS_REGION,
//! AWS_ENDPOINT_URL). Individual upload failures are reported and counted
//! but never abort the run or change the exit code: this is a best-effort
//! load generator.

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use s3_stress::{
    cleanup_buckets, plan_uploads, provision_buckets, run_uploads, Summary, DEFAULT_BUCKET_COUNT,
    DEFAULT_WORKERS,
};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Base bucket name; buckets are named <prefix>0 .. <prefix>N-1
    #[arg(long = "bucket-prefix")]
    bucket_prefix: String,

    /// Number of buckets to provision and spread uploads across
    #[arg(long = "bucket-count", default_value_t = DEFAULT_BUCKET_COUNT)]
    bucket_count: usize,

    /// Local file to upload repeatedly
    #[arg(long = "file")]
    file: PathBuf,

    /// Target aggregate size, e.g. "5000GB", "50MB", or plain bytes
    #[arg(long = "target-size")]
    target_size: String,

    /// Purge every bucket's objects after the uploads finish
    #[arg(long = "cleanup", action)]
    cleanup: bool,

    /// Maximum concurrent uploads
    #[arg(long = "workers", default_value_t = DEFAULT_WORKERS)]
    workers: usize,

    /// Abort provisioning on the first bucket-creation failure instead of
    /// carrying the broken bucket along best-effort
    #[arg(long = "fail-fast", action)]
    fail_fast: bool,

    #[arg(short = 'v',
        long,
        action = ArgAction::Count,
        help = "Increase log verbosity: -v = Info, -vv = Debug",
    )]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loads any variables from .env file that are not already set
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    if cli.workers == 0 {
        bail!("--workers must be at least 1");
    }
    if cli.bucket_count == 0 {
        bail!("--bucket-count must be at least 1");
    }

    let mut summary = Summary::default();

    let buckets =
        provision_buckets(&cli.bucket_prefix, cli.bucket_count, cli.fail_fast, &mut summary)
            .await?;

    // A zero-byte source file aborts the whole upload phase, cleanup
    // included; the early return is already logged by the planner.
    if let Some(plan) = plan_uploads(&buckets, &cli.file, &cli.target_size)? {
        run_uploads(&plan, cli.workers, &mut summary).await?;

        if cli.cleanup {
            cleanup_buckets(&buckets, &mut summary).await;
        }
    }

    println!("{}", summary);
    for failure in &summary.failures {
        eprintln!("{}", failure);
    }

    // Best-effort tool: partial failures are visible in the summary but the
    // process still exits 0.
    Ok(())
}
