//! FileSystem trait for abstracting file I/O.
//!
//! Defined in pickems-core so the document store can read and write files
//! without depending on any specific filesystem implementation. The
//! `LocalFileSystem` adapter lives in pickems-infra.

use std::path::Path;

/// Abstraction over filesystem operations.
///
/// This trait allows the store to read/write files without coupling to the
/// real filesystem, enabling easy testing with in-memory implementations.
/// Unlike a general-purpose helper, `write_file` does not create parent
/// directories: the tenant directory manager owns that step.
pub trait FileSystem: Send + Sync {
    /// Read a file's full content.
    fn read_file(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, std::io::Error>> + Send;

    /// Write bytes to a file, replacing any previous content.
    fn write_file(
        &self,
        path: &Path,
        content: &[u8],
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Atomically move `from` over `to`.
    fn rename(
        &self,
        from: &Path,
        to: &Path,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Remove a single file.
    fn remove_file(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Create a directory and all parent directories.
    fn create_dir_all(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = Result<(), std::io::Error>> + Send;

    /// Check whether a path exists.
    fn exists(
        &self,
        path: &Path,
    ) -> impl std::future::Future<Output = bool> + Send;
}
