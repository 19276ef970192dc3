use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::StorageError;

const MAX_EXTENSION_LEN: usize = 5;

/// Content-derived name of a stored object: `<sha256 hex>.<extension>`.
///
/// Two uploads of the same bytes with the same extension map to the same key,
/// so storing is idempotent.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    digest: [u8; 32],
    extension: String,
}

impl ObjectKey {
    /// Derive the key for `data` stored with the given file extension.
    pub fn for_content(data: &[u8], extension: &str) -> Result<Self, StorageError> {
        let extension = normalize_extension(extension)?;
        Ok(Self {
            digest: Sha256::digest(data).into(),
            extension,
        })
    }

    /// Parse a key in its canonical `<hex>.<ext>` form.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        let (hex_part, ext) = s
            .split_once('.')
            .ok_or_else(|| StorageError::InvalidKey("missing extension".into()))?;
        if hex_part.len() != 64 {
            return Err(StorageError::InvalidKey(format!(
                "expected 64 hex characters, got {}",
                hex_part.len()
            )));
        }
        let bytes = hex::decode(hex_part)
            .map_err(|e| StorageError::InvalidKey(format!("invalid hex: {e}")))?;
        let digest: [u8; 32] = bytes
            .try_into()
            .map_err(|_| StorageError::InvalidKey("decoded to wrong length".into()))?;
        // Keys are always written lowercase; reject anything else instead of aliasing.
        if ext != ext.to_ascii_lowercase() || hex_part != hex_part.to_ascii_lowercase() {
            return Err(StorageError::InvalidKey("key must be lowercase".into()));
        }
        Ok(Self {
            digest,
            extension: normalize_extension(ext)?,
        })
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// First two hex characters, used as the shard directory.
    pub fn shard(&self) -> String {
        hex::encode(&self.digest[..1])
    }
}

fn normalize_extension(ext: &str) -> Result<String, StorageError> {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(StorageError::InvalidKey(format!(
            "unsupported extension '{ext}'"
        )));
    }
    Ok(ext)
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.digest_hex(), self.extension)
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({self})")
    }
}

impl Serialize for ObjectKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ObjectKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
