use std::sync::Arc;

use tracing::{debug, info};

use super::present;
use crate::errors::ServiceError;
use crate::storage::ByteStore;

/// CRUD over arbitrary named files in the flat root of a [`ByteStore`].
///
/// Existence is checked right before each operation. Creation uses the
/// store's create-new write, so two racing creators cannot both succeed;
/// concurrent updates to the same name can still overwrite each other.
#[derive(Clone)]
pub struct FileService {
    store: Arc<dyn ByteStore>,
}

impl FileService {
    pub fn new(store: Arc<dyn ByteStore>) -> Self {
        Self { store }
    }

    /// Names of all files in the store root.
    pub async fn list(&self) -> Result<Vec<String>, ServiceError> {
        let names = self.store.list("").await?;
        debug!(count = names.len(), "listed files");
        Ok(names)
    }

    /// Store a new file. Both fields are required; an existing name is a conflict.
    pub async fn create(&self, filename: Option<&str>, content: Option<&str>) -> Result<(), ServiceError> {
        let (Some(name), Some(content)) = (present(filename), present(content)) else {
            return Err(ServiceError::Validation("filename and content are required".into()));
        };
        if self.store.exists(name).await? {
            return Err(ServiceError::conflict(name));
        }
        self.store.create(name, content.as_bytes()).await?;
        info!(%name, bytes = content.len(), "file created");
        Ok(())
    }

    pub async fn read(&self, name: &str) -> Result<Vec<u8>, ServiceError> {
        if !self.store.exists(name).await? {
            return Err(ServiceError::not_found(name));
        }
        Ok(self.store.read(name).await?)
    }

    /// Overwrite an existing file. Missing content is reported before a missing file.
    pub async fn update(&self, name: &str, content: Option<&str>) -> Result<(), ServiceError> {
        let Some(content) = present(content) else {
            return Err(ServiceError::Validation("content is required".into()));
        };
        if !self.store.exists(name).await? {
            return Err(ServiceError::not_found(name));
        }
        self.store.write(name, content.as_bytes()).await?;
        info!(%name, bytes = content.len(), "file updated");
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        if !self.store.exists(name).await? {
            return Err(ServiceError::not_found(name));
        }
        self.store.delete(name).await?;
        info!(%name, "file deleted");
        Ok(())
    }
}
