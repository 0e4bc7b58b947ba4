//! Filesystem adapter for Pickems.
//!
//! Implements the `FileSystem` trait from `pickems-core` over `tokio::fs`,
//! and resolves where tenant documents live.

use std::path::{Path, PathBuf};

use pickems_core::service::fs::FileSystem;
use pickems_types::config::PickemsConfig;

/// Environment variable overriding the document root.
pub const DATA_DIR_ENV: &str = "PICKEMS_DATA_DIR";

/// Local filesystem implementation of the `FileSystem` trait.
///
/// All operations go through `tokio::fs` for async I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for LocalFileSystem {
    async fn read_file(&self, path: &Path) -> Result<Vec<u8>, std::io::Error> {
        tokio::fs::read(path).await
    }

    async fn write_file(&self, path: &Path, content: &[u8]) -> Result<(), std::io::Error> {
        tokio::fs::write(path, content).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), std::io::Error> {
        tokio::fs::rename(from, to).await
    }

    async fn remove_file(&self, path: &Path) -> Result<(), std::io::Error> {
        tokio::fs::remove_file(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> Result<(), std::io::Error> {
        tokio::fs::create_dir_all(path).await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

/// Resolve the document root.
///
/// Priority:
/// 1. `PICKEMS_DATA_DIR` environment variable
/// 2. `data_dir` from `pickems.toml`
/// 3. `./data`
pub fn resolve_data_dir(config: &PickemsConfig) -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }

    config
        .data_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("data"))
}
