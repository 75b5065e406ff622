use std::{
    collections::BTreeMap,
    io,
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{validate_name, validate_prefix, ByteStore};
use crate::errors::{StoreError, StoreOp};

/// In-memory byte store, mainly for tests.
///
/// Follows the same naming rules as [`super::FsByteStore`]. Can be switched
/// into an unavailable state where every call fails with an I/O error.
#[derive(Default)]
pub struct MemoryByteStore {
    inner: RwLock<BTreeMap<String, Vec<u8>>>,
    unavailable: AtomicBool,
}

impl MemoryByteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again) with an I/O error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self, op: StoreOp, name: &str) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::new(op, name, io::Error::other("store unavailable")));
        }
        Ok(())
    }
}

fn dir_prefix(prefix: &str) -> String {
    if prefix.is_empty() {
        String::new()
    } else {
        format!("{}/", prefix.trim_end_matches('/'))
    }
}

#[async_trait]
impl ByteStore for MemoryByteStore {
    async fn exists(&self, name: &str) -> Result<bool, StoreError> {
        validate_name(StoreOp::Exists, name)?;
        self.check(StoreOp::Exists, name)?;
        Ok(self.inner.read().await.contains_key(name))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        validate_prefix(prefix)?;
        self.check(StoreOp::List, prefix)?;
        let dir = dir_prefix(prefix);
        let map = self.inner.read().await;
        Ok(map
            .keys()
            .filter(|k| k.strip_prefix(&dir).is_some_and(|rest| !rest.contains('/')))
            .cloned()
            .collect())
    }

    async fn list_recursive(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        validate_prefix(prefix)?;
        self.check(StoreOp::List, prefix)?;
        let dir = dir_prefix(prefix);
        let map = self.inner.read().await;
        Ok(map.keys().filter(|k| k.starts_with(&dir)).cloned().collect())
    }

    async fn read(&self, name: &str) -> Result<Vec<u8>, StoreError> {
        validate_name(StoreOp::Read, name)?;
        self.check(StoreOp::Read, name)?;
        self.inner
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::new(StoreOp::Read, name, io::ErrorKind::NotFound.into()))
    }

    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_name(StoreOp::Write, name)?;
        self.check(StoreOp::Write, name)?;
        self.inner.write().await.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn create(&self, name: &str, bytes: &[u8]) -> Result<(), StoreError> {
        validate_name(StoreOp::Create, name)?;
        self.check(StoreOp::Create, name)?;
        let mut map = self.inner.write().await;
        if map.contains_key(name) {
            return Err(StoreError::new(StoreOp::Create, name, io::ErrorKind::AlreadyExists.into()));
        }
        map.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), StoreError> {
        validate_name(StoreOp::Delete, name)?;
        self.check(StoreOp::Delete, name)?;
        match self.inner.write().await.remove(name) {
            Some(_) => Ok(()),
            None => Err(StoreError::new(StoreOp::Delete, name, io::ErrorKind::NotFound.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_lists_like_a_directory_tree() -> Result<(), anyhow::Error> {
        let store = MemoryByteStore::new();
        store.write("b.txt", b"b").await?;
        store.write("a.txt", b"a").await?;
        store.write("app/one.json", b"1").await?;
        store.write("app/deep/two.json", b"2").await?;

        assert_eq!(store.list("").await?, vec!["a.txt", "b.txt"]);
        assert_eq!(store.list("app").await?, vec!["app/one.json"]);
        assert_eq!(
            store.list_recursive("app").await?,
            vec!["app/deep/two.json", "app/one.json"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryByteStore::new();
        store.set_unavailable(true);
        let err = store.list("").await.err().map(|e| e.kind());
        assert_eq!(err, Some(io::ErrorKind::Other));

        store.set_unavailable(false);
        assert!(store.list("").await.is_ok());
    }
}
