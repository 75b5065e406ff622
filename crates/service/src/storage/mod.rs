//! Storage abstractions for service layer
//!
//! [`ByteStore`] is the named-blob boundary both file services talk to.
//! Names are `/`-separated paths relative to the store root.

use std::path::{Component, Path};

use async_trait::async_trait;

use crate::errors::{StoreError, StoreOp};

pub mod fs_store;
pub mod memory_store;

pub use fs_store::FsByteStore;
pub use memory_store::MemoryByteStore;

/// Named-blob persistence. Implementations can be filesystem-backed or in-memory.
#[async_trait]
pub trait ByteStore: Send + Sync {
    /// Whether a file (not a directory) is stored under `name`.
    async fn exists(&self, name: &str) -> Result<bool, StoreError>;
    /// Files directly under `prefix` (`""` is the root), sorted by name.
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
    /// Every file below `prefix` at any depth, sorted by full name.
    async fn list_recursive(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError>;
    /// Write `bytes` under `name`, replacing any previous content.
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
    /// Write `bytes` under `name` only if nothing is stored there yet;
    /// fails with `AlreadyExists` otherwise.
    async fn create(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError>;
    async fn delete(&self, name: &str) -> Result<(), StoreError>;
}

/// Reject names that are empty or would resolve outside the store root.
pub fn validate_name(op: StoreOp, name: &str) -> Result<(), StoreError> {
    let path = Path::new(name);
    let mut components = path.components().peekable();
    if components.peek().is_none() {
        return Err(StoreError::invalid_name(op, name));
    }
    if components.all(|c| matches!(c, Component::Normal(_))) {
        Ok(())
    } else {
        Err(StoreError::invalid_name(op, name))
    }
}

/// Same rule as [`validate_name`], but the root itself (`""`) is allowed.
pub fn validate_prefix(prefix: &str) -> Result<(), StoreError> {
    if prefix.is_empty() {
        return Ok(());
    }
    validate_name(StoreOp::List, prefix)
}
