use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;
use super::key::ObjectKey;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Flat bucket of publicly served objects.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `data` under `key`. Storing an existing key is a no-op.
    ///
    /// Returns `true` if the object was newly written.
    async fn put(&self, key: &ObjectKey, data: &[u8]) -> Result<bool, StorageError>;

    /// Open an object for streaming.
    async fn get_stream(&self, key: &ObjectKey) -> Result<BoxReader, StorageError>;

    /// Read a whole object into memory.
    async fn get(&self, key: &ObjectKey) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.get_stream(key).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    async fn exists(&self, key: &ObjectKey) -> Result<bool, StorageError>;

    /// Remove an object. Returns `false` if it did not exist.
    async fn delete(&self, key: &ObjectKey) -> Result<bool, StorageError>;
}
