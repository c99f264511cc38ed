// src/s3_client.rs
//
// Copyright, 2025.  Signal65 / Futurum Group.
//
//! Lazily initialized global S3 client shared by every operation in the run.
//!
//! Credentials and endpoint configuration are out-of-band: they come from the
//! environment (or a `.env` file), never from CLI flags.

use anyhow::{bail, Result};
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_s3::{config::Region, Client};
use std::env;
use tokio::sync::OnceCell;

use crate::constants::DEFAULT_REGION;

static CLIENT: OnceCell<Client> = OnceCell::const_new();

/// Async getter for the global S3 client.
/// Safe to call from any async context; initializes once without blocking.
pub async fn s3_client() -> Result<Client> {
    let client_ref = CLIENT
        .get_or_try_init(|| async {
            // Load .env first so AWS_* vars are available.
            dotenvy::dotenv().ok();

            if env::var("AWS_ACCESS_KEY_ID").is_err() || env::var("AWS_SECRET_ACCESS_KEY").is_err()
            {
                bail!(
                    "Missing AWS_ACCESS_KEY_ID or AWS_SECRET_ACCESS_KEY. \
                    Set them (and optionally AWS_REGION / AWS_ENDPOINT_URL) in your \
                    environment or a .env file."
                );
            }

            // Region & optional endpoint
            let region =
                RegionProviderChain::first_try(env::var("AWS_REGION").ok().map(Region::new))
                    .or_default_provider()
                    .or_else(Region::new(DEFAULT_REGION));

            let mut loader =
                aws_config::defaults(aws_config::BehaviorVersion::latest()).region(region);
            if let Ok(endpoint) = env::var("AWS_ENDPOINT_URL") {
                if !endpoint.is_empty() {
                    loader = loader.endpoint_url(endpoint);
                }
            }

            let cfg = loader.load().await;

            // Path-style addressing is required for S3-compatible services
            // (MinIO, Ceph, etc.) reached through a custom endpoint.
            let s3_config = aws_sdk_s3::config::Builder::from(&cfg)
                .force_path_style(true)
                .build();
            Ok::<_, anyhow::Error>(Client::from_conf(s3_config))
        })
        .await?;

    Ok(client_ref.clone())
}
