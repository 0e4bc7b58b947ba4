//! Tenant directory manager.

use std::io;
use std::path::Path;

use pickems_types::error::StoreError;

use crate::service::fs::FileSystem;

/// Create `dir` and any missing parents. A no-op when it already exists.
///
/// Safe to call concurrently: losing a creation race (`AlreadyExists` for a
/// path that now exists) is tolerated. Any other failure is returned so the
/// dependent store operation fails with it.
pub async fn ensure_directory<F: FileSystem>(fs: &F, dir: &Path) -> Result<(), StoreError> {
    let source = match fs.create_dir_all(dir).await {
        Ok(()) => {
            tracing::debug!(dir = %dir.display(), "Tenant directory ready");
            return Ok(());
        }
        Err(e) => e,
    };

    if source.kind() == io::ErrorKind::AlreadyExists && fs.exists(dir).await {
        tracing::debug!(dir = %dir.display(), "Tenant directory already exists");
        return Ok(());
    }

    tracing::warn!(dir = %dir.display(), error = %source, "Failed to create tenant directory");
    Err(StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
