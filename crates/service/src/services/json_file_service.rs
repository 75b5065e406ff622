use std::sync::Arc;

use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::{debug, info};

use super::present;
use crate::errors::ServiceError;
use crate::storage::ByteStore;

/// CRUD over JSON documents kept in one subdirectory of a [`ByteStore`].
///
/// Content must parse as JSON before it is written. Listing only reports
/// files whose current content parses.
#[derive(Clone)]
pub struct JsonFileService {
    store: Arc<dyn ByteStore>,
    dir: String,
}

/// Content passes the decode gate when it parses as a single JSON value.
pub fn is_valid_json(content: &[u8]) -> bool {
    serde_json::from_slice::<IgnoredAny>(content).is_ok()
}

fn decode_gate(content: &str) -> Result<(), ServiceError> {
    serde_json::from_str::<IgnoredAny>(content)
        .map(|_| ())
        .map_err(ServiceError::UnsupportedContent)
}

fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

impl JsonFileService {
    pub fn new(store: Arc<dyn ByteStore>, dir: impl Into<String>) -> Self {
        let dir = dir.into().trim_matches('/').to_string();
        Self { store, dir }
    }

    fn key(&self, name: &str) -> String {
        format!("{}/{}", self.dir, name)
    }

    /// Base names of every file below the directory whose content is valid JSON.
    /// Files that cannot be read or parsed are skipped.
    pub async fn list(&self) -> Result<Vec<String>, ServiceError> {
        let candidates = self.store.list_recursive(&self.dir).await?;
        let mut names = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            match self.store.read(&candidate).await {
                Ok(bytes) if is_valid_json(&bytes) => names.push(base_name(&candidate).to_string()),
                Ok(_) => debug!(name = %candidate, "skipping file with invalid JSON"),
                Err(e) => debug!(name = %candidate, error = %e, "skipping unreadable file"),
            }
        }
        Ok(names)
    }

    /// Store a new document: required fields, then conflict, then the decode gate.
    pub async fn create(&self, filename: Option<&str>, content: Option<&str>) -> Result<(), ServiceError> {
        let (Some(name), Some(content)) = (present(filename), present(content)) else {
            return Err(ServiceError::Validation("filename and content are required".into()));
        };
        let key = self.key(name);
        if self.store.exists(&key).await? {
            return Err(ServiceError::conflict(name));
        }
        decode_gate(content)?;
        self.store.create(&key, content.as_bytes()).await?;
        info!(%name, "json document created");
        Ok(())
    }

    /// Decoded document. Stored content is not re-validated; content that no
    /// longer parses is returned as `null`.
    pub async fn read(&self, name: &str) -> Result<Value, ServiceError> {
        let key = self.key(name);
        if !self.store.exists(&key).await? {
            return Err(ServiceError::not_found(name));
        }
        let bytes = self.store.read(&key).await?;
        Ok(serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn update(&self, name: &str, content: Option<&str>) -> Result<(), ServiceError> {
        let Some(content) = present(content) else {
            return Err(ServiceError::Validation("content is required".into()));
        };
        let key = self.key(name);
        if !self.store.exists(&key).await? {
            return Err(ServiceError::not_found(name));
        }
        decode_gate(content)?;
        self.store.write(&key, content.as_bytes()).await?;
        info!(%name, "json document updated");
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::Validation("filename is required".into()));
        }
        let key = self.key(name);
        if !self.store.exists(&key).await? {
            return Err(ServiceError::not_found(name));
        }
        self.store.delete(&key).await?;
        info!(%name, "json document deleted");
        Ok(())
    }
}
