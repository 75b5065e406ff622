//! Environment/runtime helpers
//!
//! Sanity checks to ensure the storage directories exist at startup.

use std::path::Path;

use tracing::{info, warn};

/// Ensure the storage root and the JSON subdirectory exist, creating them when missing.
pub async fn ensure_env(storage_root: &Path, json_dir: &str) -> anyhow::Result<()> {
    if tokio::fs::metadata(storage_root).await.is_err() {
        warn!(storage_root = %storage_root.display(), "storage root not found; creating it");
    }
    let json_path = storage_root.join(json_dir);
    tokio::fs::create_dir_all(&json_path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", json_path.display()))?;
    info!(storage_root = %storage_root.display(), %json_dir, "storage directories ready");
    Ok(())
}
