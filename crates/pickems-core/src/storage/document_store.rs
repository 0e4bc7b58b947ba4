//! Per-tenant document store.
//!
//! Whole-document get/set keyed by `(tenant, kind)`, backed by one JSON file
//! per document:
//!
//! ```text
//! {root}/{tenant}/
//!   reactionMap.json
//!   matchups.json
//!   settings.json
//!   lastMatchupMessages.json
//!   weeks.json
//! ```
//!
//! Writes are whole-file replacements. Each write goes to a uniquely named
//! temporary sibling first and is then renamed over the target, and writes to
//! the same document are serialized through [`DocumentLocks`].

use std::io;
use std::path::{Path, PathBuf};

use pickems_types::document::{DocumentKind, DocumentValue};
use pickems_types::error::StoreError;
use pickems_types::tenant::TenantId;
use uuid::Uuid;

use crate::codec;
use crate::service::fs::FileSystem;
use crate::storage::directory::ensure_directory;
use crate::storage::locks::{DocumentGuard, DocumentLocks};

/// Filesystem-backed store for the five tenant documents.
pub struct DocumentStore<F: FileSystem> {
    fs: F,
    root: PathBuf,
    locks: DocumentLocks,
}

impl<F: FileSystem> DocumentStore<F> {
    /// Create a store rooted at `root` (e.g. `./data`).
    pub fn new(fs: F, root: PathBuf) -> Self {
        Self {
            fs,
            root,
            locks: DocumentLocks::new(),
        }
    }

    /// Access the filesystem adapter.
    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Compute the tenant directory: `{root}/{tenant}/`.
    pub fn tenant_dir(&self, tenant: &TenantId) -> PathBuf {
        self.root.join(tenant.as_str())
    }

    /// Compute the file path of one document.
    pub fn document_path(&self, tenant: &TenantId, kind: DocumentKind) -> PathBuf {
        self.tenant_dir(tenant).join(kind.file_name())
    }

    /// Make sure the tenant directory exists.
    pub async fn ensure_tenant_dir(&self, tenant: &TenantId) -> Result<PathBuf, StoreError> {
        let dir = self.tenant_dir(tenant);
        ensure_directory(&self.fs, &dir).await?;
        Ok(dir)
    }

    /// Read and decode a document.
    ///
    /// Returns `Ok(None)` when the file is missing or empty. Invalid content,
    /// including whitespace-only content, is
    /// a [`StoreError::Parse`], never `None`.
    pub async fn read(
        &self,
        tenant: &TenantId,
        kind: DocumentKind,
    ) -> Result<Option<DocumentValue>, StoreError> {
        let path = self.document_path(tenant, kind);
        let Some(bytes) = self.read_bytes(&path).await? else {
            tracing::debug!(%tenant, %kind, "Document absent");
            return Ok(None);
        };

        codec::decode(&bytes)
            .map(Some)
            .map_err(|e| StoreError::Parse {
                path,
                message: e.to_string(),
            })
    }

    /// Whether the document exists with non-empty content. Does not decode.
    pub async fn contains(&self, tenant: &TenantId, kind: DocumentKind) -> Result<bool, StoreError> {
        let path = self.document_path(tenant, kind);
        Ok(self.read_bytes(&path).await?.is_some())
    }

    /// Replace a document (last writer wins).
    pub async fn write(
        &self,
        tenant: &TenantId,
        kind: DocumentKind,
        value: &DocumentValue,
    ) -> Result<(), StoreError> {
        let guard = self.lock(tenant, kind).await;
        self.write_locked(&guard, value).await
    }

    /// Wait for exclusive access to one document.
    ///
    /// Holding the guard across a read and a write makes check-then-write
    /// sequences atomic with respect to other writers in this process.
    pub async fn lock(&self, tenant: &TenantId, kind: DocumentKind) -> DocumentGuard {
        self.locks.acquire(tenant, kind).await
    }

    /// Replace the document the guard was taken for.
    pub async fn write_locked(
        &self,
        guard: &DocumentGuard,
        value: &DocumentValue,
    ) -> Result<(), StoreError> {
        let tenant = guard.tenant();
        let kind = guard.kind();

        let dir = self.ensure_tenant_dir(tenant).await?;
        let path = dir.join(kind.file_name());

        let bytes = codec::encode(value).map_err(|e| StoreError::Encode {
            kind,
            message: e.to_string(),
        })?;

        let temp_path = dir.join(format!(".{}.{}.tmp", kind.file_name(), Uuid::now_v7().simple()));
        self.fs
            .write_file(&temp_path, &bytes)
            .await
            .map_err(|source| StoreError::Io {
                path: temp_path.clone(),
                source,
            })?;

        if let Err(source) = self.fs.rename(&temp_path, &path).await {
            let _ = self.fs.remove_file(&temp_path).await;
            return Err(StoreError::Io { path, source });
        }

        tracing::debug!(%tenant, %kind, bytes = bytes.len(), "Document written");
        Ok(())
    }

    /// Read raw bytes, mapping a missing or zero-length file to `None`.
    async fn read_bytes(&self, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        match self.fs.read_file(path).await {
            Ok(bytes) if bytes.is_empty() => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryFileSystem;
    use pickems_types::document::OrderedMap;
    use serde_json::json;
    use std::sync::Arc;

    fn tenant(id: &str) -> TenantId {
        TenantId::parse(id).unwrap()
    }

    fn make_store() -> DocumentStore<MemoryFileSystem> {
        DocumentStore::new(MemoryFileSystem::new(), PathBuf::from("data"))
    }

    fn files_under(store: &DocumentStore<MemoryFileSystem>, dir: &str) -> Vec<PathBuf> {
        store.fs().paths().into_iter().filter(|p| p.starts_with(dir)).collect()
    }

    fn dirs_under(store: &DocumentStore<MemoryFileSystem>, dir: &str) -> Vec<PathBuf> {
        store.fs().dirs().into_iter().filter(|d| d.starts_with(dir)).collect()
    }

    #[test]
    fn test_document_paths() {
        let store = make_store();
        assert_eq!(
            store.document_path(&tenant("42"), DocumentKind::LastMatchupMessages),
            PathBuf::from("data/42/lastMatchupMessages.json")
        );
        assert_eq!(store.tenant_dir(&tenant("42")), PathBuf::from("data/42"));
    }

    #[tokio::test]
    async fn test_missing_document_is_absent() {
        let store = make_store();
        let value = store.read(&tenant("42"), DocumentKind::Settings).await.unwrap();
        assert!(value.is_none());
        assert!(!store.contains(&tenant("42"), DocumentKind::Settings).await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_document_is_absent() {
        let store = make_store();
        store.fs().put("data/42/weeks.json", b"");
        assert!(store.read(&tenant("42"), DocumentKind::Weeks).await.unwrap().is_none());
        assert!(!store.contains(&tenant("42"), DocumentKind::Weeks).await.unwrap());
    }

    #[tokio::test]
    async fn test_whitespace_document_is_parse_error() {
        let store = make_store();
        store.fs().put("data/42/weeks.json", b"  \n");
        let err = store.read(&tenant("42"), DocumentKind::Weeks).await.unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }), "{err:?}");
        assert!(store.contains(&tenant("42"), DocumentKind::Weeks).await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_document_is_parse_error() {
        let store = make_store();
        store.fs().put("data/42/settings.json", b"{not valid json");
        let err = store.read(&tenant("42"), DocumentKind::Settings).await.unwrap_err();
        match err {
            StoreError::Parse { path, message } => {
                assert_eq!(path, PathBuf::from("data/42/settings.json"));
                assert!(message.contains("line 1"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
        // Present, even though it cannot be decoded
        assert!(store.contains(&tenant("42"), DocumentKind::Settings).await.unwrap());
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let store = make_store();
        let mut map = OrderedMap::new();
        map.insert("🏈", DocumentValue::from("home"));
        let value = DocumentValue::Map(map);

        store.write(&tenant("42"), DocumentKind::ReactionMap, &value).await.unwrap();

        let on_disk = store
            .fs()
            .get_string(Path::new("data/42/reactionMap.json"))
            .unwrap();
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&on_disk).unwrap(),
            json!({ "dataType": "Map", "value": [["🏈", "home"]] })
        );

        let back = store.read(&tenant("42"), DocumentKind::ReactionMap).await.unwrap();
        assert_eq!(back, Some(value));
    }

    #[tokio::test]
    async fn test_write_replaces_whole_file_and_leaves_no_temp() {
        let store = make_store();
        let t = tenant("42");
        store
            .write(&t, DocumentKind::Settings, &DocumentValue::from_json(json!({ "a": 1, "b": 2 })))
            .await
            .unwrap();
        store
            .write(&t, DocumentKind::Settings, &DocumentValue::from_json(json!({ "c": 3 })))
            .await
            .unwrap();

        let back = store.read(&t, DocumentKind::Settings).await.unwrap().unwrap();
        assert_eq!(back, DocumentValue::from_json(json!({ "c": 3 })));
        assert_eq!(store.fs().paths(), vec![PathBuf::from("data/42/settings.json")]);
    }

    #[tokio::test]
    async fn test_failed_rename_cleans_up_temp_file() {
        let store = make_store();
        store.fs().fail_renames();
        let err = store
            .write(&tenant("42"), DocumentKind::Weeks, &DocumentValue::Sequence(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { ref path, .. } if path == Path::new("data/42/weeks.json")));
        assert!(store.fs().paths().is_empty());
    }

    #[tokio::test]
    async fn test_directory_failure_surfaces_on_write() {
        let store = make_store();
        store.fs().fail_create_dir_with(io::ErrorKind::PermissionDenied);
        let err = store
            .write(&tenant("42"), DocumentKind::Weeks, &DocumentValue::Sequence(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let store = make_store();
        let a = tenant("111");
        let b = tenant("222");
        store
            .write(&b, DocumentKind::Matchups, &DocumentKind::Matchups.empty_value())
            .await
            .unwrap();
        let before = store.fs().get(Path::new("data/222/matchups.json"));
        let files_b = files_under(&store, "data/222");
        let dirs_b = dirs_under(&store, "data/222");
        store.fs().clear_reads();

        let mut map = OrderedMap::new();
        map.insert("m1", DocumentValue::from_json(json!({ "home": "A" })));
        store
            .write(&a, DocumentKind::Matchups, &DocumentValue::Map(map))
            .await
            .unwrap();
        store.read(&a, DocumentKind::Matchups).await.unwrap();
        store.contains(&a, DocumentKind::Settings).await.unwrap();

        assert_eq!(store.fs().get(Path::new("data/222/matchups.json")), before);
        assert_eq!(files_under(&store, "data/222"), files_b);
        assert_eq!(dirs_under(&store, "data/222"), dirs_b);
        assert!(
            !store.fs().reads().iter().any(|p| p.starts_with("data/222")),
            "tenant 111 touched tenant 222: {:?}",
            store.fs().reads()
        );
    }

    #[tokio::test]
    async fn test_concurrent_writes_are_serialized() {
        let store = Arc::new(make_store());
        let t = tenant("42");

        let mut handles = Vec::new();
        for i in 0..16i64 {
            let store = Arc::clone(&store);
            let t = t.clone();
            handles.push(tokio::spawn(async move {
                let value = DocumentValue::from_json(json!({ "writer": i }));
                store.write(&t, DocumentKind::Settings, &value).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        // Every write landed whole; the survivor is one of the writers.
        let back = store.read(&t, DocumentKind::Settings).await.unwrap().unwrap();
        let record = back.as_record().unwrap();
        assert_eq!(record.len(), 1);
        assert!(record.get("writer").is_some());
        assert_eq!(store.fs().paths(), vec![PathBuf::from("data/42/settings.json")]);
    }

    #[tokio::test]
    async fn test_lock_blocks_plain_writes() {
        let store = Arc::new(make_store());
        let t = tenant("42");
        let guard = store.lock(&t, DocumentKind::Weeks).await;

        let writer = {
            let store = Arc::clone(&store);
            let t = t.clone();
            tokio::spawn(async move {
                store
                    .write(&t, DocumentKind::Weeks, &DocumentValue::from_json(json!([2])))
                    .await
            })
        };

        store
            .write_locked(&guard, &DocumentValue::from_json(json!([1])))
            .await
            .unwrap();
        drop(guard);
        writer.await.unwrap().unwrap();

        // The blocked writer ran after the guarded write.
        let back = store.read(&t, DocumentKind::Weeks).await.unwrap().unwrap();
        assert_eq!(back, DocumentValue::from_json(json!([2])));
    }
}
