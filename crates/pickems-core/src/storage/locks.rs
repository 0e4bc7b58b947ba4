//! Per-document write serialization.
//!
//! Each `(tenant, kind)` pair gets its own async mutex, created on first use
//! and kept for the life of the store. Lock acquisition is FIFO, so
//! concurrent writers to one document are applied in arrival order.

use std::sync::Arc;

use dashmap::DashMap;
use pickems_types::document::DocumentKind;
use pickems_types::tenant::TenantId;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Proof that the caller holds the lock for one document.
pub struct DocumentGuard {
    tenant: TenantId,
    kind: DocumentKind,
    _guard: OwnedMutexGuard<()>,
}

impl DocumentGuard {
    pub fn tenant(&self) -> &TenantId {
        &self.tenant
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }
}

/// Registry of per-document mutexes.
///
/// The `DashMap` shard guard is released before awaiting the mutex.
#[derive(Default)]
pub struct DocumentLocks {
    locks: DashMap<(TenantId, DocumentKind), Arc<Mutex<()>>>,
}

impl DocumentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to one document.
    pub async fn acquire(&self, tenant: &TenantId, kind: DocumentKind) -> DocumentGuard {
        let lock = self
            .locks
            .entry((tenant.clone(), kind))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        DocumentGuard {
            tenant: tenant.clone(),
            kind,
            _guard: lock.lock_owned().await,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}
