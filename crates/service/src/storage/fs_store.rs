use std::{io, path::PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;

use super::{validate_name, validate_prefix, ByteStore};
use crate::errors::{StoreError, StoreOp};

/// Filesystem-backed byte store rooted at a directory.
///
/// Every name is resolved relative to `root`; names that would escape it are
/// rejected before any I/O happens.
#[derive(Clone, Debug)]
pub struct FsByteStore {
    root: PathBuf,
}

impl FsByteStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, op: StoreOp, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(op, name)?;
        Ok(self.root.join(name))
    }

    async fn ensure_parent(&self, op: StoreOp, name: &str, path: &std::path::Path) -> Result<(), StoreError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::new(op, name, e))?;
        }
        Ok(())
    }
}

fn join_name(prefix: &str, file_name: &str) -> String {
    if prefix.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", prefix.trim_end_matches('/'), file_name)
    }
}

#[async_trait]
impl ByteStore for FsByteStore {
    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        let path = self.resolve(StoreOp::Exists, name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            // a parent component that is a regular file means nothing is stored there
            Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => Ok(false),
            Err(e) => Err(StoreError::new(StoreOp::Exists, name, e)),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        validate_prefix(prefix)?;
        let dir = self.root.join(prefix);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // a namespace that was never written to is simply empty
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::new(StoreOp::List, prefix, e)),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::new(StoreOp::List, prefix, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| StoreError::new(StoreOp::List, prefix, e))?;
            if file_type.is_file() {
                names.push(join_name(prefix, &entry.file_name().to_string_lossy()));
            }
        }
        names.sort();
        Ok(names)
    }

    async fn list_recursive(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        validate_prefix(prefix)?;
        let mut names = Vec::new();
        let mut pending = vec![prefix.to_string()];

        while let Some(current) = pending.pop() {
            let mut entries = match fs::read_dir(self.root.join(&current)).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(StoreError::new(StoreOp::List, current, e)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| StoreError::new(StoreOp::List, current.as_str(), e))?
            {
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| StoreError::new(StoreOp::List, current.as_str(), e))?;
                let name = join_name(&current, &entry.file_name().to_string_lossy());
                if file_type.is_dir() {
                    pending.push(name);
                } else if file_type.is_file() {
                    names.push(name);
                }
            }
        }
        names.sort();
        debug!(%prefix, count = names.len(), "recursive listing");
        Ok(names)
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.resolve(StoreOp::Read, name)?;
        fs::read(&path).await.map_err(|e| StoreError::new(StoreOp::Read, name, e))
    }

    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(StoreOp::Write, name)?;
        self.ensure_parent(StoreOp::Write, name, &path).await?;
        fs::write(&path, bytes).await.map_err(|e| StoreError::new(StoreOp::Write, name, e))
    }

    async fn create(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.resolve(StoreOp::Create, name)?;
        self.ensure_parent(StoreOp::Create, name, &path).await?;
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| StoreError::new(StoreOp::Create, name, e))?;
        file.write_all(bytes).await.map_err(|e| StoreError::new(StoreOp::Create, name, e))?;
        file.flush().await.map_err(|e| StoreError::new(StoreOp::Create, name, e))?;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.resolve(StoreOp::Delete, name)?;
        fs::remove_file(&path).await.map_err(|e| StoreError::new(StoreOp::Delete, name, e))
    }
}
