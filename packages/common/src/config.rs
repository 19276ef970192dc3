use std::path::PathBuf;

use serde::Deserialize;

/// Public image bucket configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding stored objects. Default: "./data/media".
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Maximum accepted image size in bytes. Default: 5 MiB.
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u64,
    /// Maximum accepted width or height in pixels. Default: 4096.
    #[serde(default = "default_max_image_dimension")]
    pub max_image_dimension: u32,
}

fn default_root() -> PathBuf {
    PathBuf::from("./data/media")
}
fn default_max_image_size() -> u64 {
    5 * 1024 * 1024
}
fn default_max_image_dimension() -> u32 {
    4096
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            max_image_size: default_max_image_size(),
            max_image_dimension: default_max_image_dimension(),
        }
    }
}
