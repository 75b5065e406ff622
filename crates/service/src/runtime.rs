//! Runtime environment helpers
//!
//! Thin wrapper around `common::env` to keep binary crates importing
//! `service::runtime::ensure_env` without depending directly on `common`.

use std::path::Path;

/// Ensure the storage root and JSON subdirectory exist.
pub async fn ensure_env(storage_root: &Path, json_dir: &str) -> anyhow::Result<()> {
    common::env::ensure_env(storage_root, json_dir).await
}
