use std::fmt;

/// Errors raised by an [`ObjectStore`](super::ObjectStore).
#[derive(Debug)]
pub enum StorageError {
    /// No object is stored under the key.
    NotFound(String),
    /// The key is not a valid object key.
    InvalidKey(String),
    /// The object exceeds the configured size limit.
    TooLarge { actual: u64, limit: u64 },
    Io(std::io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "object not found: {key}"),
            Self::InvalidKey(msg) => write!(f, "invalid object key: {msg}"),
            Self::TooLarge { actual, limit } => {
                write!(f, "object exceeds size limit ({actual} > {limit} bytes)")
            }
            Self::Io(err) => write!(f, "storage IO error: {err}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
