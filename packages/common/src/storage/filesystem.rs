use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::key::ObjectKey;
use super::traits::{BoxReader, ObjectStore};

/// Directory-backed object bucket.
///
/// Objects live at `{root}/{shard}/{key}` where `shard` is the first byte of
/// the content digest in hex. Writes go through `{root}/.tmp` and are renamed
/// into place so readers never observe a partial object.
pub struct FilesystemObjectStore {
    root: PathBuf,
    max_size: u64,
}

impl FilesystemObjectStore {
    pub async fn new(root: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self { root, max_size })
    }

    fn object_path(&self, key: &ObjectKey) -> PathBuf {
        self.root.join(key.shard()).join(key.to_string())
    }

    fn temp_path(&self) -> PathBuf {
        self.root
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStore for FilesystemObjectStore {
    async fn put(&self, key: &ObjectKey, data: &[u8]) -> Result<bool, StorageError> {
        let size = data.len() as u64;
        if size > self.max_size {
            return Err(StorageError::TooLarge {
                actual: size,
                limit: self.max_size,
            });
        }

        let path = self.object_path(key);
        if fs::try_exists(&path).await? {
            return Ok(false);
        }

        let temp = self.temp_path();
        if let Err(e) = fs::write(&temp, data).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        if let Err(e) = fs::rename(&temp, &path).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        tracing::debug!(%key, size, "Stored object");
        Ok(true)
    }

    async fn get_stream(&self, key: &ObjectKey) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.object_path(key)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &ObjectKey) -> Result<bool, StorageError> {
        Ok(fs::try_exists(self.object_path(key)).await?)
    }

    async fn delete(&self, key: &ObjectKey) -> Result<bool, StorageError> {
        match fs::remove_file(self.object_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
